//! Players and Participants
//!
//! The registry of everyone present in the match space. Participants are
//! fixed when the match opens; anyone joining later is a spectator for the
//! rest of the match.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateDigest, StateHasher};

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s)
            .ok()
            .map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.short())
    }
}

/// A player handle as delivered by the host: identity plus display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity
    pub id: PlayerId,
    /// Name shown in broadcast messages
    pub name: String,
}

impl Player {
    /// Create a player handle.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

// =============================================================================
// GAME MODE / ROLE
// =============================================================================

/// Host game mode the engine has put a player in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameMode {
    /// Full interaction
    Survival = 0,
    /// Cannot break or place blocks
    Adventure = 1,
    /// Invisible, no interaction
    Spectator = 2,
}

impl GameMode {
    /// Whether a player in this mode can still win.
    #[inline]
    pub fn is_survival_like(self) -> bool {
        matches!(self, GameMode::Survival | GameMode::Adventure)
    }
}

/// Role of a player within the match. Transitions only Alive -> Eliminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Role {
    /// Participant still in the running
    Alive = 0,
    /// Participant knocked out
    Eliminated = 1,
    /// Joined after the match opened; never a participant
    Spectator = 2,
}

/// Registry entry for one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Player handle
    pub player: Player,
    /// Current role
    pub role: Role,
    /// Game mode last requested for this player
    pub mode: GameMode,
    /// Tick when eliminated
    pub eliminated_tick: Option<u64>,
    /// Still connected to the match space
    pub present: bool,
}

impl Participant {
    /// Whether this entry belongs to the fixed participant set.
    #[inline]
    pub fn is_participant(&self) -> bool {
        self.role != Role::Spectator
    }

    /// Whether this player is Alive and still in a survival-like mode.
    #[inline]
    pub fn is_contender(&self) -> bool {
        self.role == Role::Alive && self.mode.is_survival_like()
    }
}

impl StateDigest for PlayerId {
    fn digest(&self, hasher: &mut StateHasher) {
        hasher.put(&self.0);
    }
}

impl StateDigest for Participant {
    fn digest(&self, hasher: &mut StateHasher) {
        hasher
            .put(&self.player.id)
            .put(&self.player.name)
            .put(&(self.role as u8))
            .put(&(self.mode as u8))
            .put(&self.eliminated_tick)
            .put(&self.present);
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Everyone in the match space, in the order they arrived.
///
/// Entries are kept in a Vec so iteration follows open order (which also
/// fixes spawn slots); the BTreeMap is an index into it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParticipantRegistry {
    entries: Vec<Participant>,
    index: BTreeMap<PlayerId, usize>,
}

impl ParticipantRegistry {
    /// Build the registry from the initial player set. Duplicates are dropped.
    pub fn from_initial(players: impl IntoIterator<Item = Player>) -> Self {
        let mut registry = Self::default();
        for player in players {
            registry.insert(player, Role::Alive, GameMode::Adventure);
        }
        registry
    }

    fn insert(&mut self, player: Player, role: Role, mode: GameMode) -> bool {
        if self.index.contains_key(&player.id) {
            return false;
        }
        self.index.insert(player.id, self.entries.len());
        self.entries.push(Participant {
            player,
            role,
            mode,
            eliminated_tick: None,
            present: true,
        });
        true
    }

    /// Register a late joiner as a spectator.
    ///
    /// Returns false if the player is already known; their role is kept and
    /// they are marked present again.
    pub fn add_spectator(&mut self, player: Player) -> bool {
        if let Some(entry) = self.get_mut(&player.id) {
            entry.present = true;
            return false;
        }
        self.insert(player, Role::Spectator, GameMode::Spectator)
    }

    /// A player left the match space.
    ///
    /// Spectators are forgotten. Participants keep their entry (and role)
    /// but are no longer present. Returns false for unknown players.
    pub fn depart(&mut self, id: &PlayerId) -> bool {
        let Some(slot) = self.index.get(id).copied() else {
            return false;
        };
        if self.entries[slot].role != Role::Spectator {
            self.entries[slot].present = false;
            return true;
        }

        self.index.remove(id);
        self.entries.remove(slot);
        for value in self.index.values_mut() {
            if *value > slot {
                *value -= 1;
            }
        }
        true
    }

    /// Look up a player.
    pub fn get(&self, id: &PlayerId) -> Option<&Participant> {
        self.index.get(id).and_then(|slot| self.entries.get(*slot))
    }

    /// Look up a player mutably.
    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Participant> {
        let slot = *self.index.get(id)?;
        self.entries.get_mut(slot)
    }

    /// Record the game mode requested for a player.
    pub fn set_mode(&mut self, id: &PlayerId, mode: GameMode) {
        if let Some(entry) = self.get_mut(id) {
            entry.mode = mode;
        }
    }

    /// Every entry, in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.entries.iter()
    }

    /// Every entry as a slice, in arrival order.
    pub fn entries(&self) -> &[Participant] {
        &self.entries
    }

    /// The fixed participant set, in open order.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.entries.iter().filter(|p| p.is_participant())
    }

    /// Participants whose role is still Alive.
    pub fn alive(&self) -> impl Iterator<Item = &Participant> {
        self.entries.iter().filter(|p| p.role == Role::Alive)
    }

    /// Ids of Alive participants, in open order.
    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.alive().map(|p| p.player.id).collect()
    }

    /// Ids of everyone still in the match space, in arrival order.
    pub fn present_ids(&self) -> Vec<PlayerId> {
        self.entries.iter().filter(|p| p.present).map(|p| p.player.id).collect()
    }

    /// Number of participants that can still win.
    pub fn contender_count(&self) -> usize {
        self.entries.iter().filter(|p| p.is_contender()).count()
    }

    /// Number of participants (fixed at open).
    pub fn participant_count(&self) -> usize {
        self.participants().count()
    }

    /// Number of entries, spectators and departed participants included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(i: u8) -> Player {
        Player::new(PlayerId::new([i; 16]), format!("p{}", i))
    }

    #[test]
    fn test_player_id_ordering() {
        let id1 = PlayerId::new([0; 16]);
        let id2 = PlayerId::new([1; 16]);
        assert!(id1 < id2);
    }

    #[test]
    fn test_uuid_round_trip() {
        let id = PlayerId::from_uuid_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(id.to_uuid_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!(PlayerId::from_uuid_str("not-a-uuid").is_none());
    }

    #[test]
    fn test_initial_set_keeps_order_and_drops_duplicates() {
        let registry = ParticipantRegistry::from_initial(vec![player(3), player(1), player(3), player(2)]);
        let names: Vec<_> = registry.participants().map(|p| p.player.name.as_str()).collect();
        assert_eq!(names, ["p3", "p1", "p2"]);
        assert_eq!(registry.contender_count(), 3);
    }

    #[test]
    fn test_spectators_are_not_participants() {
        let mut registry = ParticipantRegistry::from_initial(vec![player(1)]);
        assert!(registry.add_spectator(player(9)));
        assert!(!registry.add_spectator(player(1)));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.participant_count(), 1);
        assert_eq!(registry.get(&PlayerId::new([1; 16])).unwrap().role, Role::Alive);
    }

    #[test]
    fn test_departed_spectator_is_dropped_and_reindexed() {
        let mut registry = ParticipantRegistry::from_initial(vec![player(1)]);
        registry.add_spectator(player(8));
        registry.add_spectator(player(9));
        assert!(registry.depart(&PlayerId::new([8; 16])));
        assert!(!registry.depart(&PlayerId::new([7; 16])));
        assert_eq!(registry.get(&PlayerId::new([9; 16])).unwrap().player.name, "p9");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_departed_participant_kept_but_absent() {
        let mut registry = ParticipantRegistry::from_initial(vec![player(1), player(2)]);
        assert!(registry.depart(&PlayerId::new([1; 16])));
        assert_eq!(registry.len(), 2);
        assert!(!registry.get(&PlayerId::new([1; 16])).unwrap().present);
        assert_eq!(registry.present_ids(), vec![PlayerId::new([2; 16])]);

        // Rejoining restores presence without touching the role
        assert!(!registry.add_spectator(player(1)));
        assert_eq!(registry.present_ids().len(), 2);
        assert_eq!(registry.get(&PlayerId::new([1; 16])).unwrap().role, Role::Alive);
    }

    #[test]
    fn test_contender_requires_survival_like_mode() {
        let mut registry = ParticipantRegistry::from_initial(vec![player(1), player(2)]);
        registry.set_mode(&PlayerId::new([2; 16]), GameMode::Spectator);
        assert_eq!(registry.contender_count(), 1);
        assert_eq!(registry.alive_ids().len(), 2);
    }
}
