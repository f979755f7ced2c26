//! Response envelope returned by every handle operation

use serde::Serialize;

use crate::options::EngineOptions;
use crate::status::Status;

/// `{status, value?, options?}`
///
/// `value` is set by Get (found), Merge (echo), KeyMayExist (both outcomes)
/// and GetProperty (found). `options` is set only by GetOptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<EngineOptions>,
}

impl Response {
    pub(crate) fn from_status(status: Status) -> Self {
        Self {
            status,
            value: None,
            options: None,
        }
    }

    pub(crate) fn ok() -> Self {
        Self::from_status(Status::ok())
    }

    pub(crate) fn with_value(status: Status, value: impl Into<String>) -> Self {
        Self {
            status,
            value: Some(value.into()),
            options: None,
        }
    }

    pub(crate) fn with_options(options: EngineOptions) -> Self {
        Self {
            status: Status::ok(),
            value: None,
            options: Some(options),
        }
    }

    /// Ok with no payload, or the engine's failure status
    pub(crate) fn from_result(result: Result<(), Status>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(status) => Self::from_status(status),
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn options(&self) -> Option<&EngineOptions> {
        self.options.as_ref()
    }

    pub fn into_value(self) -> Option<String> {
        self.value
    }

    pub fn into_parts(self) -> (Status, Option<String>, Option<EngineOptions>) {
        (self.status, self.value, self.options)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_has_no_payload() {
        let response = Response::ok();
        assert!(response.is_ok());
        assert_eq!(response.value(), None);
        assert!(response.options().is_none());
    }

    #[test]
    fn test_failure_keeps_status() {
        let response = Response::from_result(Err(Status::busy("compaction")));
        assert!(!response.is_ok());
        assert!(response.status().is_busy());
    }

    #[test]
    fn test_json_omits_absent_payload() {
        let json = Response::with_value(Status::ok(), "v").to_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["value"], "v");
        assert_eq!(parsed["status"]["code"], "ok");
        assert!(parsed.get("options").is_none());
    }

    #[test]
    fn test_into_parts() {
        let (status, value, options) =
            Response::with_value(Status::not_found(""), "").into_parts();
        assert!(status.is_not_found());
        assert_eq!(value.as_deref(), Some(""));
        assert!(options.is_none());
    }
}
