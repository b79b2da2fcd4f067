use deskshare_core::{ParticipantId, Role, RoomCode};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Membership of a single room. The host is fixed at creation; there is no re-election.
#[derive(Debug, Clone)]
pub struct Room {
    host: ParticipantId,
    members: HashSet<ParticipantId>,
}

impl Room {
    fn new(host: ParticipantId) -> Self {
        Self {
            host,
            members: HashSet::new(),
        }
    }

    pub fn host(&self) -> ParticipantId {
        self.host
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    pub fn members(&self) -> impl Iterator<Item = &ParticipantId> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn role_of(&self, participant: &ParticipantId) -> Role {
        if self.host == *participant {
            Role::Host
        } else {
            Role::Guest
        }
    }
}

/// What a participant's removal did to its room.
#[derive(Debug, Clone, PartialEq)]
pub enum Departure {
    Left {
        room: RoomCode,
    },
    /// The host left: the room is gone and the remaining members are no longer in any room.
    RoomClosed {
        room: RoomCode,
        orphaned: Vec<ParticipantId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub role: Role,
    /// Members already present, who must learn about the newcomer.
    pub existing: Vec<ParticipantId>,
    /// Set when joining moved the participant out of another room.
    pub departed: Option<Departure>,
}

/// Room code -> membership, plus the reverse index enforcing one room per participant.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    membership: HashMap<ParticipantId, RoomCode>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, room: &RoomCode, participant: ParticipantId) -> JoinOutcome {
        if self.membership.get(&participant) == Some(room) {
            let role = self
                .rooms
                .get(room)
                .map(|r| r.role_of(&participant))
                .unwrap_or(Role::Guest);
            debug!("{} re-joined room {} as {}", participant, room, role);
            return JoinOutcome {
                role,
                existing: Vec::new(),
                departed: None,
            };
        }

        let departed = self.remove_participant(&participant);

        let entry = self.rooms.entry(room.clone()).or_insert_with(|| {
            info!("Creating room {} with host {}", room, participant);
            Room::new(participant)
        });

        let role = entry.role_of(&participant);
        let existing: Vec<ParticipantId> = entry.members.iter().copied().collect();
        entry.members.insert(participant);
        self.membership.insert(participant, room.clone());

        info!(
            "{} joined room {} as {} ({} members)",
            participant,
            room,
            role,
            existing.len() + 1
        );

        JoinOutcome {
            role,
            existing,
            departed,
        }
    }

    /// Remove `participant` from its room. A departing host deletes the room.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> Option<Departure> {
        let code = self.membership.remove(participant)?;
        let room = self.rooms.get_mut(&code)?;
        room.members.remove(participant);

        if room.host != *participant {
            info!("{} left room {}", participant, code);
            return Some(Departure::Left { room: code });
        }

        let room = self.rooms.remove(&code)?;
        let orphaned: Vec<ParticipantId> = room.members.into_iter().collect();
        for member in &orphaned {
            self.membership.remove(member);
        }
        info!(
            "Host {} left room {}; room closed, {} members dropped",
            participant,
            code,
            orphaned.len()
        );

        Some(Departure::RoomClosed {
            room: code,
            orphaned,
        })
    }

    pub fn is_member(&self, room: &RoomCode, participant: &ParticipantId) -> bool {
        self.membership.get(participant) == Some(room)
    }

    pub fn room(&self, room: &RoomCode) -> Option<&Room> {
        self.rooms.get(room)
    }

    pub fn room_of(&self, participant: &ParticipantId) -> Option<&RoomCode> {
        self.membership.get(participant)
    }

    pub fn host_of(&self, room: &RoomCode) -> Option<ParticipantId> {
        self.rooms.get(room).map(Room::host)
    }

    pub fn members_except(&self, room: &RoomCode, participant: &ParticipantId) -> Vec<ParticipantId> {
        self.rooms
            .get(room)
            .map(|r| r.members().filter(|m| *m != participant).copied().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
