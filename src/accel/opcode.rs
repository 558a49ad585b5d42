// Accelhub - Opcodes
//
// The closed set of abstract operations a module can execute. Wire names
// are snake_case and stable; ordering follows declaration order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AccelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    Copy,
    Fill,
    Dualcast,
    Compare,
    Crc32c,
    CopyCrc32c,
    Compress,
    Decompress,
    Encrypt,
    Decrypt,
    Xor,
    DifVerify,
    DifGenerate,
    DifGenerateCopy,
}

impl Opcode {
    /// Every opcode, in declaration order.
    pub const ALL: [Opcode; 14] = [
        Opcode::Copy,
        Opcode::Fill,
        Opcode::Dualcast,
        Opcode::Compare,
        Opcode::Crc32c,
        Opcode::CopyCrc32c,
        Opcode::Compress,
        Opcode::Decompress,
        Opcode::Encrypt,
        Opcode::Decrypt,
        Opcode::Xor,
        Opcode::DifVerify,
        Opcode::DifGenerate,
        Opcode::DifGenerateCopy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::Copy => "copy",
            Opcode::Fill => "fill",
            Opcode::Dualcast => "dualcast",
            Opcode::Compare => "compare",
            Opcode::Crc32c => "crc32c",
            Opcode::CopyCrc32c => "copy_crc32c",
            Opcode::Compress => "compress",
            Opcode::Decompress => "decompress",
            Opcode::Encrypt => "encrypt",
            Opcode::Decrypt => "decrypt",
            Opcode::Xor => "xor",
            Opcode::DifVerify => "dif_verify",
            Opcode::DifGenerate => "dif_generate",
            Opcode::DifGenerateCopy => "dif_generate_copy",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Opcode {
    type Err = AccelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| AccelError::UnknownOpcode(s.to_string()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
