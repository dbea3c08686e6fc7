//! Line-oriented payload codec.
//!
//! A compact `Key: value` rendering of [`ProtocolMessage`] used by the test
//! suite and the replay tool. It is not the SyncML XML grammar.
//!
//! ```text
//! SessionID: 1
//! MsgID: 1
//! Source: DEV-1
//! SourceName: alice
//! Cred: T1
//! Replace:
//! Item: DEV-1
//! Item: Acme
//! ```

use super::traits::{CodecError, PayloadCodec};
use crate::protocol::{
    Item, LocationRef, Operation, OperationKind, ProtocolMessage, SyncBody, SyncHeader,
};

/// `LocURI` used as the server's own address in replies.
pub const DEFAULT_SERVER_URI: &str = "./syncml";

#[derive(Debug, Clone)]
pub struct LineCodec {
    server_uri: String,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_server_uri(DEFAULT_SERVER_URI)
    }

    pub fn with_server_uri(server_uri: impl Into<String>) -> Self {
        Self {
            server_uri: server_uri.into(),
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject values that would split into extra lines on the wire.
fn single_line<'v>(element: &str, value: &'v str) -> Result<&'v str, CodecError> {
    if value.contains(['\n', '\r']) {
        return Err(CodecError::Serialize(format!(
            "{element} contains a line break"
        )));
    }
    Ok(value)
}

fn parse_u32(line: usize, value: &str) -> Result<u32, CodecError> {
    value.trim().parse().map_err(|_| CodecError::Malformed {
        line,
        message: format!("expected integer, got '{value}'"),
    })
}

impl PayloadCodec for LineCodec {
    fn parse(&self, payload: &str) -> Result<ProtocolMessage, CodecError> {
        let mut session_id = None;
        let mut msg_id = None;
        let mut source: Option<LocationRef> = None;
        let mut source_name = None;
        let mut target = None;
        let mut credential = None;
        let mut body = SyncBody::Empty;

        for (idx, raw) in payload.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let (key, value) = raw.split_once(':').ok_or_else(|| CodecError::Malformed {
                line,
                message: format!("expected 'Key: value', got '{raw}'"),
            })?;
            let value = value.strip_prefix(' ').unwrap_or(value);

            match key.trim() {
                "SessionID" => session_id = Some(parse_u32(line, value)?),
                "MsgID" => msg_id = Some(parse_u32(line, value)?),
                "Source" => source = Some(LocationRef::new(value)),
                "SourceName" => source_name = Some(value.to_string()),
                "Target" => target = Some(LocationRef::new(value)),
                "Cred" => credential = Some(value.to_string()),
                "Replace" => body = SyncBody::Replace(Vec::new()),
                "Results" => body = SyncBody::Results(Vec::new()),
                "Operations" => body = SyncBody::Operations(Vec::new()),
                "Item" => match &mut body {
                    SyncBody::Replace(items) | SyncBody::Results(items) => {
                        items.push(Item::new(value))
                    }
                    other => {
                        return Err(CodecError::Malformed {
                            line,
                            message: format!("Item outside Replace/Results ({other})"),
                        });
                    }
                },
                "Op" => {
                    let SyncBody::Operations(ops) = &mut body else {
                        return Err(CodecError::Malformed {
                            line,
                            message: "Op outside Operations".to_string(),
                        });
                    };
                    let (kind, code) =
                        value.split_once(' ').ok_or_else(|| CodecError::Malformed {
                            line,
                            message: format!("expected 'KIND CODE', got '{value}'"),
                        })?;
                    let kind: OperationKind = kind
                        .parse()
                        .map_err(|message| CodecError::Malformed { line, message })?;
                    ops.push(Operation::new(code, kind));
                }
                other => {
                    return Err(CodecError::Malformed {
                        line,
                        message: format!("unknown element '{other}'"),
                    });
                }
            }
        }

        let mut source = source.ok_or(CodecError::MissingElement("Source"))?;
        source.loc_name = source_name;
        let mut header = SyncHeader::new(
            session_id.ok_or(CodecError::MissingElement("SessionID"))?,
            msg_id.ok_or(CodecError::MissingElement("MsgID"))?,
            source,
        );
        header.target = target;
        if let Some(data) = credential {
            header = header.with_credential(data);
        }
        Ok(ProtocolMessage::new(header, body))
    }

    fn generate_reply(
        &self,
        original: &ProtocolMessage,
        operations: &[Operation],
    ) -> Result<ProtocolMessage, CodecError> {
        let header = SyncHeader::new(
            original.session_id(),
            original.msg_id(),
            LocationRef::new(self.server_uri.clone()),
        )
        .with_target(LocationRef::new(original.source_uri()));
        Ok(ProtocolMessage::new(
            header,
            SyncBody::Operations(operations.to_vec()),
        ))
    }

    fn serialize(&self, message: &ProtocolMessage) -> Result<String, CodecError> {
        let header = &message.header;

        let mut out = Vec::new();
        out.push(format!("SessionID: {}", header.session_id));
        out.push(format!("MsgID: {}", header.msg_id));
        out.push(format!(
            "Source: {}",
            single_line("Source", &header.source.loc_uri)?
        ));
        if let Some(name) = &header.source.loc_name {
            out.push(format!("SourceName: {}", single_line("SourceName", name)?));
        }
        if let Some(target) = &header.target {
            out.push(format!("Target: {}", single_line("Target", &target.loc_uri)?));
        }
        if let Some(cred) = &header.credential {
            out.push(format!("Cred: {}", single_line("Cred", &cred.data)?));
        }

        match &message.body {
            SyncBody::Replace(items) | SyncBody::Results(items) => {
                out.push(format!("{}:", message.body.section_name()));
                for item in items {
                    out.push(format!("Item: {}", single_line("Item", &item.data)?));
                }
            }
            SyncBody::Operations(ops) => {
                out.push("Operations:".to_string());
                for op in ops {
                    out.push(format!("Op: {} {}", op.kind, single_line("Op", &op.code)?));
                }
            }
            SyncBody::Empty => {}
        }

        Ok(out.join("\n"))
    }
}
