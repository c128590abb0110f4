use std::{fmt, str::FromStr};

/// A program exposed by the VM under test, named by the identifier the VM knows it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Program {
    /// Executes a whole block against a pre-state: `block`, `state`.
    Os,
    /// Parses a block and returns it: `block`.
    Block,
    /// Parses an account and returns it: `account`.
    Account,
    /// Parses a state and returns it: `state`.
    State,
    /// Elliptic curve scalar multiplication: `x`, `y`, `scalar`. Returns `x`, `y`.
    EcMul,
}

impl Program {
    /// Every program, in a stable order.
    pub const ALL: [Program; 5] =
        [Program::Os, Program::Block, Program::Account, Program::State, Program::EcMul];

    /// The identifier the VM knows this program by.
    pub const fn identifier(&self) -> &'static str {
        match self {
            Program::Os => "test_os",
            Program::Block => "test_block",
            Program::Account => "test_account",
            Program::State => "test_state",
            Program::EcMul => "test__ecmul_impl",
        }
    }

    /// The keyword inputs this program expects, in order.
    pub const fn keywords(&self) -> &'static [&'static str] {
        match self {
            Program::Os => &["block", "state"],
            Program::Block => &["block"],
            Program::Account => &["account"],
            Program::State => &["state"],
            Program::EcMul => &["x", "y", "scalar"],
        }
    }

    /// The address of the Ethereum precompile this program implements, if any.
    pub const fn precompile_address(&self) -> Option<u8> {
        match self {
            Program::EcMul => Some(0x07),
            _ => None,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Program {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::ALL
            .into_iter()
            .find(|program| program.identifier() == s)
            .ok_or_else(|| format!("unknown program '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for program in Program::ALL {
            assert_eq!(program.identifier().parse::<Program>(), Ok(program));
        }
        assert_eq!(Program::EcMul.to_string(), "test__ecmul_impl");
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!("test_receipt".parse::<Program>(), Err("unknown program 'test_receipt'".into()));
    }

    #[test]
    fn test_ec_mul_is_a_precompile() {
        assert_eq!(Program::EcMul.precompile_address(), Some(0x07));
        assert!(Program::ALL[..4].iter().all(|program| program.precompile_address().is_none()));
    }
}
