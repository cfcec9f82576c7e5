// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{required, settled};
use crate::models::Registration;
use crate::store::Store;
use crate::transport::Transport;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};

pub fn login<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    let email = required(m, "email")?;
    settled(store.login(email, required(m, "password")?))?;
    println!("Logged in as {}", email.trim());
    Ok(())
}

pub fn register<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    let registration = Registration {
        first_name: required(m, "first_name")?.trim().to_string(),
        last_name: required(m, "last_name")?.trim().to_string(),
        email: required(m, "email")?.trim().to_string(),
        password: required(m, "password")?.clone(),
    };
    settled(store.register(&registration))?;
    println!("Registered and logged in as {}", registration.email);
    Ok(())
}

pub fn logout<T: Transport>(store: &Store<T>) -> Result<()> {
    store.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami<T: Transport>(store: &Store<T>, m: &clap::ArgMatches) -> Result<()> {
    if !store.session().is_authenticated() {
        bail!("Not logged in");
    }
    settled(store.fetch_user())?;
    let Some(user) = store.state().user.user else {
        bail!("No profile returned");
    };
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &user)? {
        let rows = vec![vec![
            format!("{} {}", user.first_name, user.last_name),
            user.email.address.clone(),
            if user.email.is_confirmed { "yes" } else { "no" }.to_string(),
            user.role.name.clone(),
        ]];
        println!(
            "{}",
            pretty_table(&["Name", "Email", "Confirmed", "Role"], rows)
        );
    }
    Ok(())
}
