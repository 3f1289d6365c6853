pub mod committee_member;
pub mod event;
pub mod event_player;
pub mod event_team;
pub mod performance;
pub mod player;
pub mod player_team;
pub mod sport;
pub mod team;
pub mod user;
