//! Seated players in join order. Join order is turn order.

use serde::Serialize;

use super::error::GameError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub name: String,
    pub score: i64,
    pub ready: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, name: &str) -> Result<(), GameError> {
        if self.contains(name) {
            return Err(GameError::DuplicateName(name.to_string()));
        }
        self.players.push(Player { name: name.to_string(), score: 0, ready: false });
        Ok(())
    }

    /// Ready is monotonic; there is no way to clear it.
    pub fn set_ready(&mut self, name: &str) -> Result<(), GameError> {
        let player = self
            .get_mut(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))?;
        player.ready = true;
        Ok(())
    }

    /// Removes `name`, returning the seat index it occupied.
    pub fn leave(&mut self, name: &str) -> Option<usize> {
        let index = self.index_of(name)?;
        self.players.remove(index);
        Some(index)
    }

    pub fn can_start(&self) -> bool {
        self.players.len() >= 2 && self.players.iter().all(|p| p.ready)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn duplicate_join_is_rejected() {
        let mut reg = PlayerRegistry::new();
        reg.join("ana").unwrap();
        assert_eq!(reg.join("ana"), Err(GameError::DuplicateName("ana".into())));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn start_needs_two_ready_players() {
        let mut reg = PlayerRegistry::new();
        reg.join("ana").unwrap();
        reg.set_ready("ana").unwrap();
        assert!(!reg.can_start());

        reg.join("bo").unwrap();
        assert!(!reg.can_start());
        reg.set_ready("bo").unwrap();
        assert!(reg.can_start());
    }

    #[test]
    fn ready_for_unknown_name_fails() {
        let mut reg = PlayerRegistry::new();
        assert_eq!(reg.set_ready("ghost"), Err(GameError::UnknownPlayer("ghost".into())));
    }

    #[test]
    fn leave_reports_seat() {
        let mut reg = PlayerRegistry::new();
        for name in ["a", "b", "c"] {
            reg.join(name).unwrap();
        }
        assert_eq!(reg.leave("b"), Some(1));
        assert_eq!(reg.names(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(reg.leave("b"), None);
    }

    proptest! {
        #[test]
        fn joins_keep_order_and_reject_repeats(names in prop::collection::vec("[a-d]{1,2}", 0..24)) {
            let mut reg = PlayerRegistry::new();
            let mut expected: Vec<String> = Vec::new();
            for name in &names {
                let before = reg.len();
                match reg.join(name) {
                    Ok(()) => {
                        prop_assert!(!expected.contains(name));
                        expected.push(name.clone());
                    }
                    Err(err) => {
                        prop_assert_eq!(err, GameError::DuplicateName(name.clone()));
                        prop_assert_eq!(reg.len(), before);
                    }
                }
            }
            prop_assert_eq!(reg.names(), expected);
        }
    }
}
