use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes raw file contents as `data:<mime>;base64,<payload>`.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
