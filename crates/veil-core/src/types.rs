//! Core type definitions for Veil
//!
//! These types cross crate boundaries: the rule synthesizer emits resource
//! type sets, the classifier emits cookie categories, and both end up in JSON
//! consumed by the extension.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// Resource Types (bit mask for rule conditions)
// =============================================================================

bitflags::bitflags! {
    /// Browser resource type set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResourceTypes: u16 {
        const OTHER = 1 << 0;
        const SCRIPT = 1 << 1;
        const IMAGE = 1 << 2;
        const STYLESHEET = 1 << 3;
        const OBJECT = 1 << 4;
        const SUB_FRAME = 1 << 5;
        const MAIN_FRAME = 1 << 6;
        const XMLHTTPREQUEST = 1 << 7;
        const WEBSOCKET = 1 << 8;
        const FONT = 1 << 9;
        const MEDIA = 1 << 10;
        const PING = 1 << 11;

        /// Types covered by exact tracker-domain rules
        const TRACKER_DEFAULT = Self::SCRIPT.bits()
            | Self::XMLHTTPREQUEST.bits()
            | Self::IMAGE.bits()
            | Self::SUB_FRAME.bits();
        /// Types covered by heuristic pattern rules
        const PATTERN_DEFAULT = Self::SCRIPT.bits()
            | Self::XMLHTTPREQUEST.bits()
            | Self::IMAGE.bits();
    }
}

/// Browser type names in emission order.
const RESOURCE_TYPE_NAMES: &[(ResourceTypes, &str)] = &[
    (ResourceTypes::SCRIPT, "script"),
    (ResourceTypes::XMLHTTPREQUEST, "xmlhttprequest"),
    (ResourceTypes::IMAGE, "image"),
    (ResourceTypes::SUB_FRAME, "sub_frame"),
    (ResourceTypes::MAIN_FRAME, "main_frame"),
    (ResourceTypes::STYLESHEET, "stylesheet"),
    (ResourceTypes::FONT, "font"),
    (ResourceTypes::OBJECT, "object"),
    (ResourceTypes::MEDIA, "media"),
    (ResourceTypes::WEBSOCKET, "websocket"),
    (ResourceTypes::PING, "ping"),
    (ResourceTypes::OTHER, "other"),
];

impl ResourceTypes {
    /// Parse a single browser request type string.
    pub fn from_type_name(s: &str) -> Self {
        RESOURCE_TYPE_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(flag, _)| *flag)
            .unwrap_or(Self::OTHER)
    }

    /// Browser type names for every set flag.
    pub fn type_names(&self) -> Vec<&'static str> {
        RESOURCE_TYPE_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Numeric encoding used by the tracker model's feature vector.
    pub fn feature_code(&self) -> u8 {
        if *self == Self::SCRIPT {
            1
        } else if *self == Self::XMLHTTPREQUEST {
            2
        } else if *self == Self::IMAGE {
            3
        } else if *self == Self::STYLESHEET {
            4
        } else if *self == Self::FONT {
            5
        } else {
            0
        }
    }
}

impl Serialize for ResourceTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.type_names())
    }
}

// =============================================================================
// Cookie Categories
// =============================================================================

/// Category assigned to a cookie by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookieCategory {
    Necessary,
    Analytics,
    Advertising,
    Functional,
    SocialMedia,
    Performance,
}

impl CookieCategory {
    pub const ALL: [CookieCategory; 6] = [
        Self::Necessary,
        Self::Analytics,
        Self::Advertising,
        Self::Functional,
        Self::SocialMedia,
        Self::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Necessary => "necessary",
            Self::Analytics => "analytics",
            Self::Advertising => "advertising",
            Self::Functional => "functional",
            Self::SocialMedia => "social_media",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for CookieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
