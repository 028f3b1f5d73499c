use core::fmt;

use crate::logging::LogLevel;

/// Parameters are few, so only this many rejects are reported.
pub const MAX_REJECTED: usize = 4;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ModuleParams {
    pub loglevel: Option<LogLevel>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rejected<'a> {
    UnknownKey(&'a str),
    BadValue { key: &'a str, value: &'a str },
}

impl fmt::Display for Rejected<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::UnknownKey(key) => write!(f, "unknown parameter '{}'", key),
            Rejected::BadValue { key, value } => write!(f, "bad value '{}' for '{}'", value, key),
        }
    }
}

pub struct Parsed<'a> {
    pub params: ModuleParams,
    pub rejected: heapless::Vec<Rejected<'a>, MAX_REJECTED>,
}

/// Parse the module parameter string, e.g. `loglevel=debug`.
/// Unknown keys and bad values are collected, not fatal.
pub fn parse(s: &str) -> Parsed<'_> {
    let mut parsed = Parsed {
        params: ModuleParams::default(),
        rejected: heapless::Vec::new(),
    };

    for param in s.split_whitespace() {
        let (key, value) = param.split_once('=').unwrap_or((param, ""));
        let reject = match key {
            "loglevel" => match LogLevel::from_name(value) {
                Some(level) => {
                    parsed.params.loglevel = Some(level);
                    None
                }
                None => Some(Rejected::BadValue { key, value }),
            },
            _ => Some(Rejected::UnknownKey(key)),
        };
        if let Some(reject) = reject {
            let _ = parsed.rejected.push(reject);
        }
    }
    parsed
}
