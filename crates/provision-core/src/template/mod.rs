//! Vendor config rendering.
//!
//! The renderer only sees devices that already passed verification.

mod grandstream;
mod xml;

use provision_types::DeviceRecord;
use thiserror::Error;

pub use grandstream::GrandstreamTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no template for vendor '{0}'")]
    UnsupportedVendor(String),
    #[error("template error: {0}")]
    Template(String),
}

pub trait ConfigRenderer: Send + Sync {
    fn render(&self, device: &DeviceRecord) -> Result<String, RenderError>;
}

/// Vendor-dispatching renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigRenderer for TemplateRenderer {
    fn render(&self, device: &DeviceRecord) -> Result<String, RenderError> {
        match device.vendor.trim().to_ascii_lowercase().as_str() {
            "grandstream" => GrandstreamTemplate.render(device),
            other => Err(RenderError::UnsupportedVendor(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn device(vendor: &str) -> DeviceRecord {
        serde_json::from_value(serde_json::json!({
            "vendor": vendor,
            "mac": "001565113af8",
            "updated_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let xml = TemplateRenderer::new().render(&device("GrandStream")).unwrap();
        assert!(xml.contains("<gs_provision version=\"1\">"));
    }

    #[test]
    fn test_unknown_vendor() {
        let err = TemplateRenderer::new().render(&device("acme")).unwrap_err();
        assert_eq!(err, RenderError::UnsupportedVendor("acme".to_string()));
    }
}
