//! WebAssembly bindings for the Veil tracker matcher

use std::sync::{Arc, RwLock};

use veil_core::classify::parse_batch;
use veil_core::features::{extract_features, RequestDescriptor};
use veil_core::heuristics::{detect_dga, has_dga_subdomain, DgaOptions};
use veil_core::{CookieClassifier, CookieDescriptor, TrackerMatcher};
use wasm_bindgen::prelude::*;

// Swapped whole on reload; lookups clone the Arc and never see a half-built filter.
static MATCHER: RwLock<Option<Arc<TrackerMatcher>>> = RwLock::new(None);

fn current_matcher() -> Option<Arc<TrackerMatcher>> {
    MATCHER.read().ok().and_then(|guard| guard.clone())
}

fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

/// Load (or reload) the tracker filter. Returns `false` when the bytes are
/// malformed; lookups then answer "not a tracker" until the next good load.
#[wasm_bindgen]
pub fn init(filter_data: &[u8]) -> bool {
    let matcher = TrackerMatcher::load(filter_data);
    let available = matcher.is_available();
    if !available {
        console_warn("Veil: tracker filter failed to load, blocking disabled");
    }

    match MATCHER.write() {
        Ok(mut guard) => *guard = Some(Arc::new(matcher)),
        Err(_) => {
            console_warn("Veil: matcher state poisoned");
            return false;
        }
    }
    available
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    current_matcher().is_some_and(|m| m.is_available())
}

#[wasm_bindgen]
pub fn get_filter_info() -> JsValue {
    let result = js_sys::Object::new();
    match current_matcher().as_deref().and_then(TrackerMatcher::filter) {
        Some(filter) => {
            let _ = js_sys::Reflect::set(&result, &"initialized".into(), &JsValue::from(true));
            let _ = js_sys::Reflect::set(&result, &"sizeBits".into(), &JsValue::from(filter.size_bits()));
            let _ = js_sys::Reflect::set(&result, &"numHashes".into(), &JsValue::from(filter.num_hashes()));
            let _ = js_sys::Reflect::set(&result, &"fillRatio".into(), &JsValue::from(filter.fill_ratio()));
        }
        None => {
            let _ = js_sys::Reflect::set(&result, &"initialized".into(), &JsValue::from(false));
        }
    }
    result.into()
}

#[wasm_bindgen]
pub fn is_tracker(domain: &str) -> bool {
    match current_matcher() {
        Some(matcher) => matcher.is_tracker(domain),
        None => false,
    }
}

/// Check a CNAME chain (array of strings). Returns the first tracker target,
/// or `null`.
#[wasm_bindgen]
pub fn uncloak(chain: JsValue) -> JsValue {
    let matcher = match current_matcher() {
        Some(matcher) => matcher,
        None => return JsValue::NULL,
    };

    let targets: Vec<String> = js_sys::Array::from(&chain)
        .iter()
        .filter_map(|value| value.as_string())
        .collect();

    match matcher.uncloak(&targets) {
        Some(hit) => JsValue::from_str(hit),
        None => JsValue::NULL,
    }
}

/// Whether `host` should be resolved and checked with [`uncloak`].
#[wasm_bindgen]
pub fn should_uncloak(host: &str, page_host: Option<String>) -> bool {
    match current_matcher() {
        Some(matcher) => matcher.should_uncloak(host, page_host.as_deref()),
        None => false,
    }
}

/// Whether any subdomain label of `host` looks algorithmically generated.
#[wasm_bindgen]
pub fn is_dga_host(host: &str) -> bool {
    has_dga_subdomain(host, &DgaOptions::default())
}

/// DGA verdict for one subdomain label, as JSON.
#[wasm_bindgen]
pub fn dga_verdict(label: &str) -> Result<String, JsValue> {
    let verdict = detect_dga(label, &DgaOptions::default());
    serde_json::to_string(&verdict).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify one cookie given as JSON; returns the report as JSON.
#[wasm_bindgen]
pub fn classify_cookie(cookie_json: &str) -> Result<String, JsValue> {
    let cookie = CookieDescriptor::from_json(cookie_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let report = CookieClassifier::default().report(&cookie);
    serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify a batch (`{"cookies": [...]}` or a bare array); returns JSON.
#[wasm_bindgen]
pub fn classify_cookies(batch_json: &str) -> Result<String, JsValue> {
    let cookies = parse_batch(batch_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let report = CookieClassifier::default()
        .classify_batch(&cookies)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Feature vector for the tracker model, from a request JSON description.
#[wasm_bindgen]
pub fn request_features(request_json: &str) -> Result<js_sys::Float32Array, JsValue> {
    let request: RequestDescriptor =
        serde_json::from_str(request_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let features = extract_features(&request);
    Ok(js_sys::Float32Array::from(&features[..]))
}
