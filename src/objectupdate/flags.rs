// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command line flag editing for container args.

fn matches_flag(arg: &str, name: &str) -> bool {
    arg == name
        || arg
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('='))
}

/// Set `name` (with `value`, or as a bare switch) replacing any previous
/// occurrence in place, or append it.
pub fn set_flag(args: &mut Vec<String>, name: &str, value: Option<&str>) {
    let rendered = match value {
        Some(value) => format!("{name}={value}"),
        None => name.to_string(),
    };

    match args.iter().position(|arg| matches_flag(arg, name)) {
        Some(idx) => {
            args[idx] = rendered;
            let mut seen = 0;
            args.retain(|arg| {
                if matches_flag(arg, name) {
                    seen += 1;
                    seen == 1
                } else {
                    true
                }
            });
        }
        None => args.push(rendered),
    }
}

pub fn remove_flag(args: &mut Vec<String>, name: &str) {
    args.retain(|arg| !matches_flag(arg, name));
}
