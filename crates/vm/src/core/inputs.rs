use std::collections::BTreeMap;

use alloy::primitives::U256;
use mimir_model::{
    encode::{encode_uint, Encode, Encoding},
    Account, Block, State,
};
use serde_json::{Map, Value};

/// A single keyword argument to a VM program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A full block.
    Block(Block),
    /// A single account.
    Account(Account),
    /// A state snapshot.
    State(State),
    /// A 256-bit word, such as a curve coordinate or a scalar.
    Word(U256),
}

impl Input {
    /// Renders this input in the VM-native interchange shape.
    pub fn to_native(&self) -> Value {
        match self {
            Input::Block(block) => block.to_native(),
            Input::Account(account) => account.to_native(),
            Input::State(state) => state.to_native(),
            Input::Word(word) => encode_uint(*word, Encoding::Native),
        }
    }
}

impl From<Block> for Input {
    fn from(block: Block) -> Self {
        Input::Block(block)
    }
}

impl From<Account> for Input {
    fn from(account: Account) -> Self {
        Input::Account(account)
    }
}

impl From<State> for Input {
    fn from(state: State) -> Self {
        Input::State(state)
    }
}

impl From<U256> for Input {
    fn from(word: U256) -> Self {
        Input::Word(word)
    }
}

/// The keyword arguments of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs(BTreeMap<String, Input>);

impl Inputs {
    /// The most keywords [`Inputs::summary`] names.
    pub const SUMMARY_KEYWORDS: usize = 4;

    /// Creates an empty set of inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a keyword argument, replacing any previous value for `keyword`.
    pub fn with(mut self, keyword: impl Into<String>, input: impl Into<Input>) -> Self {
        self.0.insert(keyword.into(), input.into());
        self
    }

    /// Returns the argument for `keyword`, if present.
    pub fn get(&self, keyword: &str) -> Option<&Input> {
        self.0.get(keyword)
    }

    /// Iterates over `(keyword, input)` pairs in keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Input)> {
        self.0.iter()
    }

    /// A short listing of the keywords, for error reports. Lists at most
    /// [`Inputs::SUMMARY_KEYWORDS`] of them.
    pub fn summary(&self) -> String {
        let listed: Vec<&str> =
            self.0.keys().take(Self::SUMMARY_KEYWORDS).map(String::as_str).collect();

        match self.0.len().saturating_sub(Self::SUMMARY_KEYWORDS) {
            0 => listed.join(", "),
            rest => format!("{} and {rest} more", listed.join(", ")),
        }
    }

    /// Renders every argument in the VM-native interchange shape, as one JSON object.
    pub fn to_native(&self) -> Value {
        let map: Map<String, Value> =
            self.0.iter().map(|(keyword, input)| (keyword.clone(), input.to_native())).collect();
        Value::Object(map)
    }
}
