//! Chain domain - read-only views over program events and transactions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signature that may contain a pool creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramEvent {
    pub signature: String,
    pub observed_at: DateTime<Utc>,
}

impl ProgramEvent {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            observed_at: Utc::now(),
        }
    }
}

/// One log notification from the push subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNotification {
    pub signature: String,
    /// Transaction error, if the transaction failed
    pub err: Option<String>,
    pub logs: Vec<String>,
}

/// One entry of a program's signature history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub signature: String,
    /// Unix seconds
    pub block_time: Option<i64>,
}

/// Instruction as returned by a parsed transaction fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInstruction {
    pub program_id: String,
    /// `None` when the node already fully decoded the instruction
    pub accounts: Option<Vec<String>>,
}

impl ParsedInstruction {
    pub fn partially_decoded(program_id: impl Into<String>, accounts: Vec<String>) -> Self {
        Self {
            program_id: program_id.into(),
            accounts: Some(accounts),
        }
    }

    pub fn decoded(program_id: impl Into<String>) -> Self {
        Self {
            program_id: program_id.into(),
            accounts: None,
        }
    }
}

/// Top-level instructions of a fetched transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub signature: String,
    pub slot: u64,
    pub instructions: Vec<ParsedInstruction>,
}

impl ParsedTransaction {
    /// First instruction for `program_id` that exposes an account list
    pub fn find_program_instruction(&self, program_id: &str) -> Option<&[String]> {
        self.instructions
            .iter()
            .filter(|ix| ix.program_id == program_id)
            .find_map(|ix| ix.accounts.as_deref())
    }
}
