// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Reducer, Status};
use crate::models::UserProfile;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub user: Option<UserProfile>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    Pending,
    Rejected(String),
    Loaded(UserProfile),
}

impl Reducer for UserState {
    type Event = UserEvent;

    fn pending() -> UserEvent {
        UserEvent::Pending
    }

    fn rejected(message: String) -> UserEvent {
        UserEvent::Rejected(message)
    }

    fn reduce(&self, event: UserEvent) -> Self {
        let mut next = self.clone();
        match event {
            UserEvent::Pending => next.status = Status::pending(),
            UserEvent::Rejected(message) => next.status = Status::failed(message),
            UserEvent::Loaded(user) => {
                next.status = Status::idle();
                next.user = Some(user);
            }
        }
        next
    }
}
