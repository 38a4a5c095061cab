//! Configuration utilities (port, table rules, snapshot visibility).

use std::env;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{bail, Context};

use crate::game::{SessionOptions, SnapshotPolicy, TurnRule};

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub addr: SocketAddr,
    pub session: SessionOptions,
}

impl Config {
    /// Read the process environment.
    ///
    /// - `PORT`: listen port on 0.0.0.0, default 5000
    /// - `SKYJO_TURN_RULE`: `single_action` (default) or `draw_then_place`
    /// - `SKYJO_EXPOSE_DECK`: include deck order in `game_state`
    /// - `SKYJO_EXPOSE_HIDDEN`: include face-down cards in `game_state`
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(v) => v.parse::<u16>().with_context(|| format!("invalid PORT '{v}'"))?,
            None => 5000,
        };
        let rule = match lookup("SKYJO_TURN_RULE").as_deref() {
            None | Some("single_action") => TurnRule::SingleAction,
            Some("draw_then_place") => TurnRule::DrawThenPlace,
            Some(other) => bail!("invalid SKYJO_TURN_RULE '{other}'"),
        };
        let policy = SnapshotPolicy {
            expose_deck: flag(&lookup, "SKYJO_EXPOSE_DECK")?,
            expose_hidden: flag(&lookup, "SKYJO_EXPOSE_HIDDEN")?,
        };
        Ok(Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            session: SessionOptions { rule, policy },
        })
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<bool> {
    match lookup(key).as_deref() {
        None | Some("") | Some("0") | Some("false") => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some(other) => bail!("invalid {key} '{other}', expected true or false"),
    }
}
