//! Prompt module
//!
//! Interactive collection of organization, username, password and region.

use crate::config::Settings;
use crate::console::{Console, Key};
use crate::credentials::{Credentials, Region, SecurePassword};
use std::io;

/// Read a password one key at a time, echoing `*` per character.
///
/// Backspace removes the last character and erases one `*`; on an empty
/// buffer it does nothing. Enter ends input, possibly with an empty buffer.
/// Keys without a character are ignored.
pub fn read_masked_password<C: Console>(console: &mut C) -> io::Result<SecurePassword> {
    let mut password = SecurePassword::new();

    loop {
        match console.read_key(false)? {
            Key::Enter => return Ok(password),
            Key::Backspace => {
                if password.pop() {
                    console.write("\u{8} \u{8}")?;
                }
            }
            Key::Char(c) => {
                password.push(c);
                console.write("*")?;
            }
            Key::Escape | Key::Other => {}
        }
    }
}

/// Show the region menu and read the single-key answer
pub fn prompt_region<C: Console>(console: &mut C) -> io::Result<Region> {
    console.write_line("\nIs Organization in North America? ")?;
    console.write_line(
        "   1. Yes\n\
         \x20  2. No\n\
         \x20  *Values other than 1 will perform a search in all geographies. \
         Not choosing \"Yes\" may slow down login times.\n",
    )?;
    console.write("Enter value: ")?;

    let key = match console.read_key(true)? {
        Key::Char(c) => Some(c),
        _ => None,
    };
    let region = Region::from_menu_key(key);
    console.write_line(&format!(" ... Region: {}", region))?;

    Ok(region)
}

/// Run the full credential prompt for one connection attempt
pub fn prompt_credentials<C: Console>(
    console: &mut C,
    settings: &Settings,
) -> io::Result<Credentials> {
    console.write("Dynamics 365 Organization Name: ")?;
    let organization = console.read_line()?;

    console.write("Enter Username <JohnDoe | JohnDoe@test.onmicrosoft.com>: ")?;
    let username = console.read_line()?;

    console.write("Enter password: ")?;
    let password = read_masked_password(console)?;
    console.write_line("")?;

    let region = prompt_region(console)?;

    console.write_line("\nPress any key to continue...")?;
    console.read_key(false)?;

    let credentials = Credentials::new(
        organization,
        &username,
        password,
        region,
        &settings.tenant_domain_suffix,
    );
    tracing::debug!(
        "Collected credentials for {} (organization: {}, region: {})",
        credentials.user_id,
        credentials.organization,
        credentials.region
    );

    Ok(credentials)
}
