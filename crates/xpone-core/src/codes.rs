// ── IEEE 802.11 reason and status codes ──
//
// Reason codes accompany deauthentication and disassociation frames;
// status codes accompany (re)association and authentication responses.
// Descriptions follow IEEE 802.11-2020, Tables 9-49 and 9-50, trimmed to
// the codes controllers actually report.

use serde::Serialize;
use strum::{Display, EnumString};

/// How alarming a disconnect reason is for an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Normal lifecycle: roaming, client leaving, inactivity.
    Info,
    /// Capability or policy mismatch, usually a configuration issue.
    Warning,
    /// Authentication or security failure.
    Error,
}

/// A resolved code with its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub code: u16,
    pub description: &'static str,
    pub known: bool,
}

const UNKNOWN_REASON: &str = "Unknown reason code";
const UNKNOWN_STATUS: &str = "Unknown status code";

fn reason_text(code: u16) -> Option<&'static str> {
    let text = match code {
        1 => "Unspecified reason",
        2 => "Previous authentication no longer valid",
        3 => "Deauthenticated because sending station is leaving (or has left) the BSS",
        4 => "Disassociated due to inactivity",
        5 => "Disassociated because AP is unable to handle all currently associated stations",
        6 => "Class 2 frame received from nonauthenticated station",
        7 => "Class 3 frame received from nonassociated station",
        8 => "Disassociated because sending station is leaving (or has left) the BSS",
        9 => "Station requesting (re)association is not authenticated with responding station",
        10 => "Disassociated because the information in the Power Capability element is unacceptable",
        11 => "Disassociated because the information in the Supported Channels element is unacceptable",
        12 => "Disassociated due to BSS transition management",
        13 => "Invalid element",
        14 => "Message integrity code (MIC) failure",
        15 => "4-way handshake timeout",
        16 => "Group key handshake timeout",
        17 => "Element in 4-way handshake different from (re)association request",
        18 => "Invalid group cipher",
        19 => "Invalid pairwise cipher",
        20 => "Invalid AKMP",
        21 => "Unsupported RSNE version",
        22 => "Invalid RSNE capabilities",
        23 => "IEEE 802.1X authentication failed",
        24 => "Cipher suite rejected because of the security policy",
        25 => "TDLS direct-link teardown due to TDLS peer STA unreachable via the TDLS direct link",
        26 => "TDLS direct-link teardown for unspecified reason",
        32 => "Disassociated for unspecified, QoS-related reason",
        33 => "Disassociated because QoS AP lacks sufficient bandwidth for this QoS station",
        34 => "Disassociated because excessive frames need to be acknowledged due to poor channel conditions",
        35 => "Disassociated because station is transmitting outside the limits of its TXOPs",
        36 => "Requesting station is leaving the BSS (or resetting)",
        37 => "Requesting station is no longer using the stream or session",
        38 => "Requesting station received frames using a mechanism for which setup has not been completed",
        39 => "Requested from peer station due to timeout",
        45 => "Peer station does not support the requested cipher suite",
        46 => "Disassociated because authorized access limit reached",
        47 => "Disassociated due to external service requirements",
        48 => "Invalid FT Action frame count",
        49 => "Invalid pairwise master key identifier (PMKID)",
        50 => "Invalid MDE",
        51 => "Invalid FTE",
        66 => "Disassociated because of a mesh channel switch",
        _ => return None,
    };
    Some(text)
}

fn status_text(code: u16) -> Option<&'static str> {
    let text = match code {
        0 => "Successful",
        1 => "Unspecified failure",
        2 => "TDLS wakeup schedule rejected but alternative schedule provided",
        3 => "TDLS wakeup schedule rejected",
        5 => "Security disabled",
        6 => "Unacceptable lifetime",
        7 => "Not in same BSS",
        10 => "Cannot support all requested capabilities in the Capability Information field",
        11 => "Reassociation denied due to inability to confirm that association exists",
        12 => "Association denied due to reason outside the scope of this standard",
        13 => "Responding station does not support the specified authentication algorithm",
        14 => "Received an authentication frame with authentication transaction sequence number out of expected sequence",
        15 => "Authentication rejected because of challenge failure",
        16 => "Authentication rejected due to timeout waiting for next frame in sequence",
        17 => "AP is unable to handle additional associated stations",
        18 => "Association denied due to requesting station not supporting all basic rates",
        19 => "Association denied due to requesting station not supporting short preamble",
        22 => "Association request rejected because Spectrum Management capability is required",
        23 => "Association request rejected because the information in the Power Capability element is unacceptable",
        24 => "Association request rejected because the information in the Supported Channels element is unacceptable",
        25 => "Association denied due to requesting station not supporting short slot time",
        27 => "Association denied because the requesting station does not support HT features",
        28 => "R0KH unreachable",
        29 => "Association denied because the requesting station does not support PCO transition time",
        30 => "Association request rejected temporarily; try again later",
        31 => "Robust management frame policy violation",
        32 => "Unspecified, QoS-related failure",
        33 => "Association denied because QoS AP has insufficient bandwidth",
        34 => "Association denied due to excessive frame loss rates or poor channel conditions",
        35 => "Association (with QoS BSS) denied because the requesting station does not support QoS",
        37 => "The request has been declined",
        38 => "The request has not been successful as one or more parameters have invalid values",
        39 => "The allocation or TS has not been created; a suggested change is provided",
        40 => "Invalid element",
        41 => "Invalid group cipher",
        42 => "Invalid pairwise cipher",
        43 => "Invalid AKMP",
        44 => "Unsupported RSNE version",
        45 => "Invalid RSNE capabilities",
        46 => "Cipher suite rejected because of security policy",
        47 => "The TS or allocation has not been created; it may be possible after the indicated delay",
        48 => "Direct link is not allowed in the BSS by policy",
        49 => "The destination station is not present within this BSS",
        50 => "The destination station is not a QoS station",
        51 => "Association denied because the listen interval is too large",
        52 => "Invalid FT Action frame count",
        53 => "Invalid pairwise master key identifier (PMKID)",
        54 => "Invalid MDE",
        55 => "Invalid FTE",
        72 => "Invalid contents of RSNE",
        76 => "Anti-clogging token required (SAE)",
        77 => "Finite cyclic group not supported (SAE)",
        82 => "Rejected with suggested BSS transition",
        93 => "Association denied due to an unspecified mesh-related reason",
        _ => return None,
    };
    Some(text)
}

/// Description of a deauthentication/disassociation reason code.
pub fn reason_description(code: u16) -> &'static str {
    reason_text(code).unwrap_or(UNKNOWN_REASON)
}

/// Description of an association/authentication status code.
pub fn status_description(code: u16) -> &'static str {
    status_text(code).unwrap_or(UNKNOWN_STATUS)
}

pub fn reason(code: u16) -> CodeInfo {
    let text = reason_text(code);
    CodeInfo {
        code,
        description: text.unwrap_or(UNKNOWN_REASON),
        known: text.is_some(),
    }
}

pub fn status(code: u16) -> CodeInfo {
    let text = status_text(code);
    CodeInfo {
        code,
        description: text.unwrap_or(UNKNOWN_STATUS),
        known: text.is_some(),
    }
}

/// Operator-facing severity of a reason code. Unknown codes are warnings.
pub fn reason_severity(code: u16) -> Severity {
    match code {
        3 | 4 | 8 | 12 | 36 | 37 | 39 | 66 => Severity::Info,
        2 | 14..=24 | 45 | 49 => Severity::Error,
        _ => Severity::Warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_reasons_are_described() {
        assert_eq!(reason_description(4), "Disassociated due to inactivity");
        assert_eq!(reason_description(15), "4-way handshake timeout");
        assert!(reason(23).known);
    }

    #[test]
    fn unknown_codes_get_generic_text() {
        assert_eq!(reason_description(999), "Unknown reason code");
        assert_eq!(status_description(999), "Unknown status code");
        assert!(!status(999).known);
    }

    #[test]
    fn status_zero_is_success() {
        assert_eq!(status_description(0), "Successful");
        assert_eq!(status(17).description, "AP is unable to handle additional associated stations");
    }

    #[test]
    fn severity_classification() {
        assert_eq!(reason_severity(8), Severity::Info);
        assert_eq!(reason_severity(15), Severity::Error);
        assert_eq!(reason_severity(5), Severity::Warning);
        assert_eq!(reason_severity(1000), Severity::Warning);
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
