use crate::{
    cli::{
        actions::report,
        globals::GlobalArgs,
        output::{self, Table, cell},
    },
    library::{LibraryClient, ProfileUpdate, Registration, UserProfile},
    navigation::{self, Screen},
};
use anyhow::Result;
use secrecy::SecretString;
use serde_json::json;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

#[derive(Debug)]
pub enum Operation {
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    Register(Registration),
    Whoami {
        refresh: bool,
    },
    Menu,
    ShowProfile,
    UpdateProfile(ProfileUpdate),
}

/// Execute an account action.
/// # Errors
/// Returns an error if the session cannot be opened or the service call fails.
pub async fn execute(args: Args) -> Result<()> {
    let Args { globals, operation } = args;
    let client = globals.client()?;

    match operation {
        Operation::Login { username, password } => {
            let role = client.login(&username, &password).await.map_err(report)?;
            let message = role.map_or_else(
                || format!("Logged in as {username}"),
                |role| format!("Logged in as {username} ({role})"),
            );
            output::status(globals.json, &message, &json!({ "role": role }))
        }
        Operation::Logout => {
            client.logout().map_err(report)?;
            output::status(globals.json, "Logged out", &json!({}))
        }
        Operation::Register(registration) => {
            client.register(registration).await.map_err(report)?;
            output::status(
                globals.json,
                "Registration complete, you can now log in",
                &json!({}),
            )
        }
        Operation::Whoami { refresh } => whoami(&client, &globals, refresh).await,
        Operation::Menu => menu(&client, &globals),
        Operation::ShowProfile => {
            let profile = client.profile().await.map_err(report)?;
            print_profile(&globals, &profile)
        }
        Operation::UpdateProfile(update) => {
            let profile = client.update_profile(update).await.map_err(report)?;
            print_profile(&globals, &profile)
        }
    }
}

async fn whoami(client: &LibraryClient, globals: &GlobalArgs, refresh: bool) -> Result<()> {
    if refresh && client.session().is_authenticated() {
        client.refresh_role().await.map_err(report)?;
    }

    let session = client.session();
    let authenticated = session.is_authenticated();
    let value = json!({
        "authenticated": authenticated,
        "role": session.role,
        "sessionFile": globals.session_file,
    });

    output::emit(globals.json, &value, || {
        let mut table = Table::new(&["FIELD", "VALUE"]);
        table.row(vec!["authenticated".to_string(), authenticated.to_string()]);
        table.row(vec!["role".to_string(), cell(session.role)]);
        table.row(vec![
            "session file".to_string(),
            globals.session_file.display().to_string(),
        ]);
        table
    })
}

fn menu(client: &LibraryClient, globals: &GlobalArgs) -> Result<()> {
    let screens: Vec<Screen> = navigation::menu(&client.session());
    let value: Vec<_> = screens
        .iter()
        .map(|screen| json!({ "title": screen.title(), "path": screen.path() }))
        .collect();

    output::emit(globals.json, &value, || {
        let mut table = Table::new(&["SCREEN", "PATH"]);
        for screen in &screens {
            table.row(vec![screen.title().to_string(), screen.path().to_string()]);
        }
        table
    })
}

fn print_profile(globals: &GlobalArgs, profile: &UserProfile) -> Result<()> {
    output::emit(globals.json, profile, || {
        let mut table = Table::new(&["FIELD", "VALUE"]);
        for (field, value) in [
            ("first name", cell(profile.first_name.as_deref())),
            ("second name", cell(profile.second_name.as_deref())),
            ("third name", cell(profile.third_name.as_deref())),
            ("email", cell(profile.email.as_deref())),
            ("main address", cell(profile.main_address.as_deref())),
            ("age", cell(profile.age)),
            ("role", cell(profile.role.as_deref())),
        ] {
            table.row(vec![field.to_string(), value]);
        }
        table
    })
}
