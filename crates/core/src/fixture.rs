use std::path::Path;

use mimir_common::utils::io::file::read_file;
use mimir_model::{
    fixtures, from_raw, parse_account, parse_block, parse_state, Account, Block, RawResult,
    State,
};
use mimir_vm::Program;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// A single test scenario.
///
/// On disk a fixture is a JSON mapping with a `kind` and one entry per keyword input of the
/// program it runs:
///
/// ```json
/// { "kind": "account", "account": { "balance": "0x00", "nonce": "0x01", ... } }
/// ```
///
/// | kind      | program        | inputs             |
/// |-----------|----------------|--------------------|
/// | `os`      | `test_os`      | `block`, `state`   |
/// | `block`   | `test_block`   | `block`            |
/// | `account` | `test_account` | `account`          |
/// | `state`   | `test_state`   | `state`            |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixture {
    /// Execute a block on a pre-state.
    Os {
        /// The block to execute.
        block: Block,
        /// The pre-state.
        state: State,
    },
    /// Round-trip a block.
    Block(Block),
    /// Round-trip an account.
    Account(Account),
    /// Round-trip a state.
    State(State),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Kind {
    Os,
    Block,
    Account,
    State,
}

/// The `kind` tag, read ahead of the inputs so they keep their field paths.
#[derive(Debug, Deserialize)]
struct Tagged {
    kind: Kind,
}

#[derive(Debug, Deserialize)]
struct OsInputs {
    block: Block,
    state: State,
}

#[derive(Debug, Deserialize)]
struct BlockInput {
    block: Block,
}

#[derive(Debug, Deserialize)]
struct AccountInput {
    account: Account,
}

#[derive(Debug, Deserialize)]
struct StateInput {
    state: State,
}

impl Fixture {
    /// The `kind` tag of this fixture.
    pub fn kind(&self) -> &'static str {
        match self {
            Fixture::Os { .. } => "os",
            Fixture::Block(_) => "block",
            Fixture::Account(_) => "account",
            Fixture::State(_) => "state",
        }
    }

    /// The program this fixture runs.
    pub fn program(&self) -> Program {
        match self {
            Fixture::Os { .. } => Program::Os,
            Fixture::Block(_) => Program::Block,
            Fixture::Account(_) => Program::Account,
            Fixture::State(_) => Program::State,
        }
    }

    /// Parses a fixture mapping. Every input is validated before anything is run.
    pub fn parse(raw: &RawResult) -> Result<Self, Error> {
        let Tagged { kind } = from_raw(raw)?;

        let fixture = match kind {
            Kind::Os => {
                let OsInputs { block, state } = from_raw(raw)?;
                Fixture::Os { block, state }
            }
            Kind::Block => Fixture::Block(from_raw::<BlockInput>(raw)?.block),
            Kind::Account => Fixture::Account(from_raw::<AccountInput>(raw)?.account),
            Kind::State => Fixture::State(from_raw::<StateInput>(raw)?.state),
        };
        Ok(fixture)
    }

    /// Reads and parses a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let fixture_error = |reason: String| Error::Fixture { path: path.to_path_buf(), reason };

        let contents = read_file(path).map_err(|e| fixture_error(e.to_string()))?;
        let raw: Value =
            serde_json::from_str(&contents).map_err(|e| fixture_error(e.to_string()))?;

        Self::parse(&raw)
    }

    /// The built-in scenarios, by name.
    pub fn builtins() -> Result<Vec<(&'static str, Fixture)>, Error> {
        let block = parse_block(&fixtures::block())?;
        let state = parse_state(&fixtures::state())?;

        Ok(vec![
            ("os", Fixture::Os { block: block.clone(), state: state.clone() }),
            ("block", Fixture::Block(block)),
            ("account", Fixture::Account(parse_account(&fixtures::account())?)),
            ("state", Fixture::State(state)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_account_fixture() {
        let fixture = Fixture::parse(&json!({ "kind": "account", "account": fixtures::account() }))
            .expect("fixture parses");

        assert_eq!(fixture.kind(), "account");
        assert_eq!(fixture.program(), Program::Account);
        match fixture {
            Fixture::Account(account) => assert_eq!(account.nonce, 1),
            other => panic!("unexpected fixture {other:?}"),
        }
    }

    #[test]
    fn test_parse_os_fixture_requires_both_inputs() {
        let err = Fixture::parse(&json!({ "kind": "os", "block": fixtures::block() }))
            .expect_err("state is missing");

        assert!(matches!(
            err,
            Error::Model(mimir_model::Error::SchemaViolation { ref path, .. }) if path == "state"
        ));
    }

    #[test]
    fn test_unknown_kind() {
        let err = Fixture::parse(&json!({ "kind": "receipt" })).expect_err("kind is unknown");
        assert!(matches!(
            err,
            Error::Model(mimir_model::Error::SchemaViolation { ref path, ref reason })
                if path == "kind" && reason.contains("unknown variant `receipt`")
        ));

        let err = Fixture::parse(&json!({ "account": {} })).expect_err("kind is missing");
        assert!(matches!(
            err,
            Error::Model(mimir_model::Error::SchemaViolation { ref path, .. }) if path == "kind"
        ));
    }

    #[test]
    fn test_input_errors_name_the_input() {
        let mut account = fixtures::account();
        account["nonce"] = json!("0x1x");

        let err = Fixture::parse(&json!({ "kind": "account", "account": account }))
            .expect_err("nonce is not hex");
        assert!(matches!(
            err,
            Error::Model(mimir_model::Error::MalformedHex { ref path, .. }) if path == "account.nonce"
        ));
    }

    #[test]
    fn test_builtins() {
        let builtins = Fixture::builtins().expect("built-in fixtures parse");
        let kinds: Vec<_> = builtins.iter().map(|(_, fixture)| fixture.kind()).collect();
        assert_eq!(kinds, ["os", "block", "account", "state"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Fixture::load("/nonexistent/mimir/fixture.json").expect_err("file is missing");
        assert!(matches!(err, Error::Fixture { .. }));
    }
}
