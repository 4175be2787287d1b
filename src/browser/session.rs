use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browser::driver::PageDriver;
use crate::dom::distill::Annotation;
use crate::dom::node::DomNode;
use crate::error::AutopilotError;

const DEFAULT_SIDECAR: &str = "node/autofill_server.js";

/// Request sent to the sidecar over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Settle {
        cmd: &'static str,
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    Extract {
        cmd: &'static str,
    },
    Annotate {
        cmd: &'static str,
        #[serde(rename = "backendId")]
        backend_id: u64,
        #[serde(rename = "fieldId")]
        field_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    FieldAction {
        cmd: &'static str,
        action: &'static str,
        #[serde(rename = "fieldId")]
        field_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    CountFields {
        cmd: &'static str,
        #[serde(rename = "fieldId")]
        field_id: String,
    },
    QueryTexts {
        cmd: &'static str,
        selector: String,
    },
    QueryVisibleText {
        cmd: &'static str,
        selector: String,
    },
    ClickNth {
        cmd: &'static str,
        selector: String,
        index: usize,
    },
    PressKey {
        cmd: &'static str,
        key: &'static str,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    fn field_action(action: &'static str, field_id: &str, value: Option<&str>) -> Self {
        BrowserRequest::FieldAction {
            cmd: "field_action",
            action,
            field_id: field_id.to_string(),
            value: value.map(str::to_string),
        }
    }
}

/// Response received from the sidecar over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub ready: Option<bool>,
}

/// A persistent browser session backed by a long-lived Node.js sidecar that
/// keeps one Chromium page open. Commands are NDJSON over stdin, responses
/// read line-by-line from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
}

impl BrowserSession {
    pub fn launch() -> Result<Self, AutopilotError> {
        Self::launch_with_script(DEFAULT_SIDECAR)
    }

    pub fn launch_with_script(script: &str) -> Result<Self, AutopilotError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AutopilotError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AutopilotError::SessionIo("Failed to capture stdin of sidecar".into())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            AutopilotError::SessionIo("Failed to capture stdout of sidecar".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| AutopilotError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| AutopilotError::JsonParse {
                context: "sidecar ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(AutopilotError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from sidecar".into(),
            });
        }

        Ok(BrowserSession { child, stdin, reader })
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AutopilotError> {
        let json = serde_json::to_string(request).map_err(|e| AutopilotError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| AutopilotError::SessionIo(format!("Failed to write to sidecar: {}", e)))?;
        self.stdin
            .flush()
            .map_err(|e| AutopilotError::SessionIo(format!("Failed to flush sidecar stdin: {}", e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| AutopilotError::SessionIo(format!("Failed to read from sidecar: {}", e)))?;

        if line.trim().is_empty() {
            return Err(AutopilotError::SessionIo(
                "Empty response from sidecar (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| AutopilotError::JsonParse {
            context: "sidecar response".into(),
            source: e,
        })
    }

    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, AutopilotError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(AutopilotError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    pub fn quit(&mut self) -> Result<(), AutopilotError> {
        // Best-effort quit; the process may already be gone
        let _ = self.send(&BrowserRequest::Quit { cmd: "quit" });
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), AutopilotError> {
        self.send_ok(
            &BrowserRequest::Navigate { cmd: "navigate", url: url.to_string() },
            "navigate",
        )?;
        Ok(())
    }

    fn settle(&mut self, ms: u64) -> Result<(), AutopilotError> {
        self.send_ok(&BrowserRequest::Settle { cmd: "settle", duration_ms: ms }, "settle")?;
        Ok(())
    }

    fn extract_tree(&mut self) -> Result<DomNode, AutopilotError> {
        let response = self.send_ok(&BrowserRequest::Extract { cmd: "extract" }, "extract")?;
        let data = response.data.ok_or_else(|| AutopilotError::SessionProtocol {
            command: "extract".into(),
            error: "No data in extract response".into(),
        })?;
        serde_json::from_value(data).map_err(|e| AutopilotError::JsonParse {
            context: "extracted DOM tree".into(),
            source: e,
        })
    }

    fn annotate(&mut self, annotation: &Annotation) -> Result<(), AutopilotError> {
        self.send_ok(
            &BrowserRequest::Annotate {
                cmd: "annotate",
                backend_id: annotation.backend_id,
                field_id: annotation.field_id.clone(),
                label: annotation.label.clone(),
            },
            "annotate",
        )?;
        Ok(())
    }

    fn count_fields(&mut self, field_id: &str) -> Result<u32, AutopilotError> {
        let response = self.send_ok(
            &BrowserRequest::CountFields { cmd: "count_fields", field_id: field_id.to_string() },
            "count_fields",
        )?;
        Ok(response.count.unwrap_or(0))
    }

    fn fill_field(&mut self, field_id: &str, value: &str) -> Result<(), AutopilotError> {
        self.send_ok(&BrowserRequest::field_action("fill", field_id, Some(value)), "fill")?;
        Ok(())
    }

    fn upload_file(&mut self, field_id: &str, path: &str) -> Result<(), AutopilotError> {
        self.send_ok(&BrowserRequest::field_action("upload", field_id, Some(path)), "upload")?;
        Ok(())
    }

    fn check_field(&mut self, field_id: &str) -> Result<(), AutopilotError> {
        self.send_ok(&BrowserRequest::field_action("check", field_id, None), "check")?;
        Ok(())
    }

    fn click_field(&mut self, field_id: &str) -> Result<(), AutopilotError> {
        self.send_ok(&BrowserRequest::field_action("click", field_id, None), "click")?;
        Ok(())
    }

    fn open_control(&mut self, field_id: &str) -> Result<(), AutopilotError> {
        self.send_ok(&BrowserRequest::field_action("open", field_id, None), "open")?;
        Ok(())
    }

    fn option_texts(&mut self, selector: &str) -> Result<Vec<String>, AutopilotError> {
        let response = self.send_ok(
            &BrowserRequest::QueryTexts { cmd: "query_texts", selector: selector.to_string() },
            "query_texts",
        )?;
        Ok(response.texts.unwrap_or_default())
    }

    fn first_visible_with_text(&mut self, selector: &str) -> Result<bool, AutopilotError> {
        let response = self.send_ok(
            &BrowserRequest::QueryVisibleText {
                cmd: "query_visible_text",
                selector: selector.to_string(),
            },
            "query_visible_text",
        )?;
        Ok(response.visible.unwrap_or(false))
    }

    fn click_option(&mut self, selector: &str, index: usize) -> Result<(), AutopilotError> {
        self.send_ok(
            &BrowserRequest::ClickNth { cmd: "click_nth", selector: selector.to_string(), index },
            "click_nth",
        )?;
        Ok(())
    }

    fn press_escape(&mut self) -> Result<(), AutopilotError> {
        self.send_ok(&BrowserRequest::PressKey { cmd: "press_key", key: "Escape" }, "press_key")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
