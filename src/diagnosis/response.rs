// Response post-processing and display rendering
// Author: kelexine (https://github.com/kelexine)

use crate::error::DiagnosisError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shown when the provider returned no usable text.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "（无响应内容）";

/// The two display fields of a finished cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// First line plus the elapsed-time annotation.
    pub summary: String,
    /// Remaining lines joined by `\n`.
    pub reasoning: String,
}

impl DiagnosisResult {
    /// Split provider text and annotate the headline with `elapsed`.
    pub fn from_response(content: &str, elapsed: Duration) -> Self {
        let (headline, reasoning) = split_response(content);
        Self {
            summary: format!(
                "{}\n\n⏱️ 响应时间：{}",
                headline,
                format_elapsed(elapsed)
            ),
            reasoning,
        }
    }

    /// A failed cycle: rendered message as summary, reasoning cleared.
    pub fn from_error(err: &DiagnosisError) -> Self {
        Self {
            summary: render_error(err),
            reasoning: String::new(),
        }
    }
}

/// Split `content` into its first non-blank line and the remaining non-blank
/// lines joined by `\n`. Blank input yields the placeholder headline.
pub fn split_response(content: &str) -> (String, String) {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    match lines.next() {
        Some(first) => (first.to_string(), lines.collect::<Vec<_>>().join("\n")),
        None => (EMPTY_CONTENT_PLACEHOLDER.to_string(), String::new()),
    }
}

/// Seconds with one decimal place, e.g. `3.2 秒`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1} 秒", elapsed.as_secs_f64())
}

/// User-visible message for a failed cycle.
pub fn render_error(err: &DiagnosisError) -> String {
    match err {
        DiagnosisError::Provider {
            status,
            status_text,
            body,
        } => format!("❌ 请求失败：{} {}\n{}", status, status_text, body),
        DiagnosisError::Decoding(_) | DiagnosisError::Encoding(_) => {
            format!("⚠️ 图像处理失败：{}", err)
        }
        DiagnosisError::Busy => "⏳ 诊断中...请等待当前请求完成".to_string(),
        _ => format!("⚠️ 网络或Key问题：{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_first_line_and_rest() {
        let (headline, reasoning) = split_response("肺部未见异常\n建议随访");
        assert_eq!(headline, "肺部未见异常");
        assert_eq!(reasoning, "建议随访");
    }

    #[test]
    fn test_blank_lines_dropped() {
        let (headline, reasoning) = split_response("\n\n结论\n\n  \n第一点\r\n第二点\n");
        assert_eq!(headline, "结论");
        assert_eq!(reasoning, "第一点\n第二点");
    }

    #[test]
    fn test_empty_content_uses_placeholder() {
        let result = DiagnosisResult::from_response("", Duration::from_millis(1500));
        assert!(result.summary.starts_with(EMPTY_CONTENT_PLACEHOLDER));
        assert!(result.reasoning.is_empty());
    }

    #[test]
    fn test_summary_carries_elapsed_seconds() {
        let result =
            DiagnosisResult::from_response("肺部未见异常\n建议随访", Duration::from_millis(2340));
        assert_eq!(result.summary, "肺部未见异常\n\n⏱️ 响应时间：2.3 秒");
        assert_eq!(result.reasoning, "建议随访");
    }

    #[test]
    fn test_provider_error_rendering() {
        let err = DiagnosisError::Provider {
            status: 401,
            status_text: "Unauthorized".to_string(),
            body: "{\"error\":\"invalid key\"}".to_string(),
        };
        let result = DiagnosisResult::from_error(&err);
        assert_eq!(
            result.summary,
            "❌ 请求失败：401 Unauthorized\n{\"error\":\"invalid key\"}"
        );
        assert!(result.reasoning.is_empty());
    }

    #[test]
    fn test_network_error_rendering() {
        let err = DiagnosisError::Network("connection refused".to_string());
        assert!(render_error(&err).starts_with("⚠️ 网络或Key问题："));
        assert!(render_error(&err).contains("connection refused"));
    }
}
