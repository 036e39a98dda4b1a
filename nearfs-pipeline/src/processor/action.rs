//! Decoding of receipt actions.
//!
//! Actions use serde's externally tagged enum encoding: unit variants are a
//! bare string (`"CreateAccount"`), every other variant is an object with a
//! single key naming the variant (`{"FunctionCall": {...}}`).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use nearfs_shared::types::{Payload, RawAction};
use serde_json::Value;

use crate::errors::DecodeError;

/// Known action variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CreateAccount,
    DeployContract,
    FunctionCall,
    Transfer,
    Stake,
    AddKey,
    DeleteKey,
    DeleteAccount,
    Delegate,
    DeployGlobalContract,
    DeployGlobalContractByAccountId,
    UseGlobalContract,
    UseGlobalContractByAccountId,
    DeterministicStateInit,
}

impl ActionKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "CreateAccount" => Self::CreateAccount,
            "DeployContract" => Self::DeployContract,
            "FunctionCall" => Self::FunctionCall,
            "Transfer" => Self::Transfer,
            "Stake" => Self::Stake,
            "AddKey" => Self::AddKey,
            "DeleteKey" => Self::DeleteKey,
            "DeleteAccount" => Self::DeleteAccount,
            "Delegate" => Self::Delegate,
            "DeployGlobalContract" => Self::DeployGlobalContract,
            "DeployGlobalContractByAccountId" => Self::DeployGlobalContractByAccountId,
            "UseGlobalContract" => Self::UseGlobalContract,
            "UseGlobalContractByAccountId" => Self::UseGlobalContractByAccountId,
            "DeterministicStateInit" => Self::DeterministicStateInit,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAccount => "CreateAccount",
            Self::DeployContract => "DeployContract",
            Self::FunctionCall => "FunctionCall",
            Self::Transfer => "Transfer",
            Self::Stake => "Stake",
            Self::AddKey => "AddKey",
            Self::DeleteKey => "DeleteKey",
            Self::DeleteAccount => "DeleteAccount",
            Self::Delegate => "Delegate",
            Self::DeployGlobalContract => "DeployGlobalContract",
            Self::DeployGlobalContractByAccountId => "DeployGlobalContractByAccountId",
            Self::UseGlobalContract => "UseGlobalContract",
            Self::UseGlobalContractByAccountId => "UseGlobalContractByAccountId",
            Self::DeterministicStateInit => "DeterministicStateInit",
        }
    }
}

/// A decoded action, borrowing from the raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<'a> {
    FunctionCall(FunctionCallAction<'a>),
    /// Any other known variant. Its arguments are not inspected.
    Other(ActionKind),
}

impl Action<'_> {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::FunctionCall(_) => ActionKind::FunctionCall,
            Self::Other(kind) => *kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallAction<'a> {
    pub method_name: &'a str,
    args: Option<&'a Value>,
}

impl FunctionCallAction<'_> {
    /// Decodes the base64 `args` of the call into a payload.
    pub fn payload(&self) -> Result<Payload, DecodeError> {
        let encoded = self
            .args
            .ok_or(DecodeError::MissingField {
                kind: ActionKind::FunctionCall.as_str().to_string(),
                field: "args",
            })?
            .as_str()
            .ok_or_else(|| DecodeError::InvalidField {
                kind: ActionKind::FunctionCall.as_str().to_string(),
                field: "args",
                message: "expected a base64 string".to_string(),
            })?;

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
        Ok(Payload::from(bytes))
    }
}

/// Splits an externally tagged value into its tag and optional contents.
pub fn split_variant(value: &Value) -> Result<(&str, Option<&Value>), DecodeError> {
    match value {
        Value::String(tag) => Ok((tag.as_str(), None)),
        Value::Object(map) if map.len() == 1 => {
            let (tag, contents) = map
                .iter()
                .next()
                .ok_or(DecodeError::AmbiguousVariant(0))?;
            Ok((tag.as_str(), Some(contents)))
        }
        Value::Object(map) => Err(DecodeError::AmbiguousVariant(map.len())),
        other => Err(DecodeError::MalformedVariant(other.to_string())),
    }
}

/// Decodes one raw action.
pub fn decode_action(raw: &RawAction) -> Result<Action<'_>, DecodeError> {
    let (tag, contents) = split_variant(&raw.0)?;
    let kind =
        ActionKind::from_tag(tag).ok_or_else(|| DecodeError::UnknownActionKind(tag.to_string()))?;

    if kind != ActionKind::FunctionCall {
        return Ok(Action::Other(kind));
    }

    let fields = contents
        .ok_or(DecodeError::MissingField {
            kind: kind.as_str().to_string(),
            field: "method_name",
        })?
        .as_object()
        .ok_or_else(|| DecodeError::MalformedVariant(format!("{} arguments must be an object", tag)))?;

    let method_name = fields
        .get("method_name")
        .ok_or(DecodeError::MissingField {
            kind: kind.as_str().to_string(),
            field: "method_name",
        })?
        .as_str()
        .ok_or_else(|| DecodeError::InvalidField {
            kind: kind.as_str().to_string(),
            field: "method_name",
            message: "expected a string".to_string(),
        })?;

    Ok(Action::FunctionCall(FunctionCallAction {
        method_name,
        args: fields.get("args"),
    }))
}
