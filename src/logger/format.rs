//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variables`

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log layout, parsed once from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Combined,
    Common,
    Json,
    Custom(String),
}

impl LogFormat {
    /// Known names map to their format; anything else is a custom pattern
    pub fn parse(name: &str) -> Self {
        match name {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            pattern => Self::Custom(pattern.to_string()),
        }
    }
}

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    /// 1.0, 1.1 or 2
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current local time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &LogFormat) -> String {
        match format {
            LogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                dash(self.referer.as_deref()),
                dash(self.user_agent.as_deref()),
            ),
            LogFormat::Common => self.format_common(),
            LogFormat::Json => self.format_json(),
            LogFormat::Custom(pattern) => self.format_custom(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Substitute `$variables` in `pattern`
    ///
    /// Longer names are replaced before their prefixes (`$request_time`
    /// before `$request`).
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        let vars: [(&str, String); 12] = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", dash(self.referer.as_deref()).to_string()),
            ("$http_user_agent", dash(self.user_agent.as_deref()).to_string()),
            ("$path", self.path.clone()),
        ];

        vars.iter()
            .fold(pattern.to_string(), |acc, (name, value)| acc.replace(name, value))
    }
}

fn dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "10.0.0.7".to_string(),
            "GET".to_string(),
            "/hello".to_string(),
        );
        entry.query = Some("lang=en".to_string());
        entry.status = 200;
        entry.body_bytes = 27;
        entry.referer = Some("https://example.com".to_string());
        entry.user_agent = Some("curl/8.5.0".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_parse_format_names() {
        assert_eq!(LogFormat::parse("combined"), LogFormat::Combined);
        assert_eq!(LogFormat::parse("common"), LogFormat::Common);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(
            LogFormat::parse("$status $path"),
            LogFormat::Custom("$status $path".to_string())
        );
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format(&LogFormat::Combined);
        assert!(log.starts_with("10.0.0.7 - - ["));
        assert!(log.contains("\"GET /hello?lang=en HTTP/1.1\" 200 27"));
        assert!(log.ends_with("\"https://example.com\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_format_common_omits_headers() {
        let mut entry = create_test_entry();
        entry.status = 404;
        entry.body_bytes = 19;
        let log = entry.format(&LogFormat::Common);
        assert!(log.ends_with("\"GET /hello?lang=en HTTP/1.1\" 404 19"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_json_is_valid() {
        let mut entry = create_test_entry();
        entry.user_agent = Some("quote\" and \\ backslash".to_string());
        entry.referer = None;

        let log = entry.format(&LogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 27);
        assert_eq!(value["user_agent"], "quote\" and \\ backslash");
        assert!(value["referer"].is_null());
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry()
            .format(&LogFormat::parse("$request_method $request_uri -> $status in $request_time"));
        assert_eq!(log, "GET /hello?lang=en -> 200 in 0.002");
    }

    #[test]
    fn test_format_custom_missing_headers_dash() {
        let entry = AccessLogEntry::new("::1".to_string(), "GET".to_string(), "/".to_string());
        let log = entry.format(&LogFormat::parse("$http_referer|$http_user_agent|$request"));
        assert_eq!(log, "-|-|GET / HTTP/1.1");
    }
}
