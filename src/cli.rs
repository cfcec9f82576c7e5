// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{API_URL_ENV, AUTH_SCHEME_ENV, DEFAULT_API_URL};
use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("name").long("name").help("Name contains"))
        .arg(Arg::new("amount_from").long("amount-from"))
        .arg(Arg::new("amount_to").long("amount-to"))
        .arg(Arg::new("from").long("from").help("YYYY-MM-DD"))
        .arg(Arg::new("to").long("to").help("YYYY-MM-DD"))
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_parser(value_parser!(u32))
                .help("Page size sent to the server"),
        )
}

fn ids_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .num_args(1..)
        .action(ArgAction::Append)
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .required(true)
        .help("income|expense")
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Fintrack: command line client for the personal finance tracker")
        .version(clap::crate_version!())
        .arg(
            Arg::new("api_url")
                .long("api-url")
                .env(API_URL_ENV)
                .global(true)
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            Arg::new("auth_scheme")
                .long("auth-scheme")
                .env(AUTH_SCHEME_ENV)
                .global(true)
                .default_value("raw")
                .help("How the access token is sent: raw|bearer"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Request timeout in seconds"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and sign in")
                .arg(Arg::new("first_name").long("first-name").required(true))
                .arg(Arg::new("last_name").long("last-name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(json_flags(
            Command::new("whoami").about("Show the signed-in user"),
        ))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("balance").long("balance").default_value("0"))
                        .arg(
                            Arg::new("currency_id")
                                .long("currency-id")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("default")
                                .long("default")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("default")
                                .long("default")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(Command::new("currencies")),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(json_flags(filter_args(Command::new("list"))))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(type_arg())
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("rm").arg(ids_arg())),
        )
        .subcommand(
            Command::new("rules")
                .about("Recurring transaction rules")
                .subcommand(json_flags(filter_args(Command::new("list"))))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(type_arg())
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(Arg::new("start").long("start").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(type_arg())
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("next_run")
                                .long("next-run")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("inactive")
                                .long("inactive")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("rm").arg(ids_arg()))
                .subcommand(Command::new("frequencies")),
        )
        .subcommand(
            Command::new("report")
                .about("Server-side monthly reports")
                .subcommand(json_flags(Command::new("monthly")))
                .subcommand(json_flags(Command::new("savings"))),
        )
        .subcommand(
            Command::new("import")
                .about("Import transactions from a spreadsheet")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(
                    Command::new("template")
                        .arg(Arg::new("format").long("format").default_value("xlsx"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("format").long("format").default_value("xlsx"))
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(Arg::new("from").long("from"))
                    .arg(Arg::new("to").long("to")),
            ),
        )
}
