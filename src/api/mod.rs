// src/api/mod.rs

pub mod attestations;
pub mod claims;
pub mod health;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{AttestationView, NotificationService};

#[derive(Clone)]
pub struct AppState {
    pub view: Arc<AttestationView>,
    pub notifications: NotificationService,
    pub config: Config,
}

impl AppState {
    pub fn new(view: Arc<AttestationView>, notifications: NotificationService, config: Config) -> Self {
        Self {
            view,
            notifications,
            config,
        }
    }
}
