//! ClubDesk API - Backend for a role-based sports-club administration dashboard
//!
//! This crate provides the REST data layer for ClubDesk, covering:
//! - Club member, sport, team, player, event, and committee management
//! - Many-to-many relationship reconciliation (event teams, event players, team rosters)
//! - Derived win-rate statistics and rankings

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
