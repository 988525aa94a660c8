use crate::core::preferences::PreferenceStore;

pub enum CommandResult {
    /// Input was handled here; optionally show a status line.
    Continue(Option<String>),
    /// Input asked for the settings overlay.
    OpenSettings,
    /// Not a command, send it as a chat message.
    ProcessAsMessage(String),
}

pub fn process_input(store: &PreferenceStore, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let argument = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

    match command_name {
        "help" => CommandResult::Continue(Some(
            "Commands: /model [id], /temperature [value], /settings, /help".to_string(),
        )),
        "settings" => CommandResult::OpenSettings,
        "model" => match argument {
            Some(id) => {
                let mut preferences = store.get();
                preferences.model = id.to_string();
                store.set(preferences);
                CommandResult::Continue(Some(format!("Model set: {id}")))
            }
            None => CommandResult::Continue(Some(format!("Model: {}", store.get().model))),
        },
        "temperature" => match argument {
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) => {
                    let mut preferences = store.get();
                    preferences.temperature = value;
                    store.set(preferences);
                    CommandResult::Continue(Some(format!("Temperature set: {value}")))
                }
                Err(_) => CommandResult::Continue(Some(format!(
                    "Not a temperature: {raw} (try /temperature 0.7)"
                ))),
            },
            None => CommandResult::Continue(Some(format!(
                "Temperature: {}",
                store.get().temperature
            ))),
        },
        _ => CommandResult::Continue(Some(format!(
            "Unknown command: /{command_name} (try /help)"
        ))),
    }
}
