//! Built-in tracker corpus, used when no input list is supplied.
//!
//! A curated subset of EasyPrivacy third-party domains plus known CNAME
//! cloaking targets and fingerprinting services.

use veil_core::Domain;

pub const BUILTIN_TRACKER_DOMAINS: &[&str] = &[
    // Major Ad/Tracking Networks
    "doubleclick.net",
    "googlesyndication.com",
    "google-analytics.com",
    "googletagmanager.com",
    "googleadservices.com",
    "googletagservices.com",
    "2mdn.net",
    "adnxs.com",
    "adsrvr.org",
    "advertising.com",
    "amazon-adsystem.com",
    "analytics.google.com",
    "app-measurement.com",
    "appsflyer.com",
    "atdmt.com",
    "bidswitch.net",
    "bluekai.com",
    "casalemedia.com",
    "chartbeat.com",
    "chartbeat.net",
    "clicktale.net",
    "cloudflareinsights.com",
    "contextweb.com",
    "cpm-ad.com",
    "cpmstar.com",
    "criteo.com",
    "criteo.net",
    "crwdcntrl.net",
    "demdex.net",
    "dotomi.com",
    "doubleverify.com",
    "dpm.demdex.net",
    "eversttech.net",
    "exelator.com",
    "eyeota.net",
    "facebook.net",
    "fbcdn.net",
    "flashtalking.com",
    "fls.doubleclick.net",
    "hotjar.com",
    "hotjar.io",
    "ib-ibi.com",
    "id5-sync.com",
    "igodigital.com",
    "indexww.com",
    "iovation.com",
    "ipredictive.com",
    "krxd.net",
    "lijit.com",
    "liveintent.com",
    "liveramp.com",
    "lotame.com",
    "marketo.com",
    "marketo.net",
    "mathtag.com",
    "media.net",
    "mediamath.com",
    "ml314.com",
    "moatads.com",
    "mookie1.com",
    "myvisualiq.net",
    "narrative.io",
    "nativo.com",
    "newrelic.com",
    "nr-data.net",
    "omtrdc.net",
    "onetag-sys.com",
    "openx.net",
    "outbrain.com",
    "owneriq.net",
    "pardot.com",
    "parsely.com",
    "perimeterx.net",
    "pinterest.com",
    "pippio.com",
    "pubmatic.com",
    "quantcast.com",
    "quantserve.com",
    "rfihub.com",
    "rlcdn.com",
    "rubiconproject.com",
    "samba.tv",
    "scorecardresearch.com",
    "segment.com",
    "segment.io",
    "serving-sys.com",
    "sharethis.com",
    "simpli.fi",
    "sitescout.com",
    "smartadserver.com",
    "snapchat.com",
    "sojern.com",
    "spotxchange.com",
    "taboola.com",
    "tapad.com",
    "teads.tv",
    "tealiumiq.com",
    "thetradedesk.com",
    "tidaltv.com",
    "tiktok.com",
    "tribalfusion.com",
    "turn.com",
    "twitter.com",
    "tynt.com",
    "undertone.com",
    "urbanairship.com",
    "visualiq.com",
    "w55c.net",
    "yieldmo.com",
    "zedo.com",
    // CNAME Cloaking Known Targets
    "adobedtm.com",
    "eulerian.net",
    "at-o.net",
    "keyade.com",
    "storetail.io",
    "dnsdelegation.io",
    "tracedock.com",
    "akamaized.net",
    "edgekey.net",
    "akadns.net",
    // Fingerprinting Services
    "fingerprintjs.com",
    "fpjs.io",
    "areyouamhuman.com",
    "datadome.co",
    "hcaptcha.com",
    "sift.com",
    "siftscience.com",
    "shape.com",
    "distilnetworks.com",
    "imperva.com",
    "kasada.io",
];

/// The built-in corpus as normalized domains.
pub fn builtin_domains() -> Vec<Domain> {
    BUILTIN_TRACKER_DOMAINS
        .iter()
        .filter_map(|d| Domain::parse(d))
        .collect()
}
