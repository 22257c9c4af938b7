use crate::config::Config;
use crate::crm::DemoData;
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::events::worker::{Event as WorkerEvent, Handler as WorkerEventHandler};
use crate::forms::FormDefaults;
use crate::logger::{CustomLogger, LogBuffer};
use crate::state::State;
use crate::store::{FileStorage, Store};
use crate::ui::Theme;
use anyhow::{anyhow, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type WorkerEventSender = std::sync::mpsc::Sender<WorkerEvent>;
type WorkerEventReceiver = std::sync::mpsc::Receiver<WorkerEvent>;
pub type ConfigSaveSender = std::sync::mpsc::Sender<()>;
type ConfigSaveReceiver = std::sync::mpsc::Receiver<()>;

/// Start-up choices taken from the command line.
///
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Path of the first page to show.
    pub route: Option<String>,
}

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

/// Build the initial state from the configuration: the store opened over the
/// data directory, seeded with demo records when enabled.
///
pub fn initial_state(config: &Config, logs: LogBuffer) -> State {
    let defaults = if config.seed_demo_data {
        DemoData::generate(&config.default_owner)
    } else {
        DemoData::default()
    };
    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
    let store = Store::open(storage, &config.mirrored_collections, defaults);
    let theme = Theme::from_name(&config.theme_name).unwrap_or_else(|| {
        warn!("Unknown theme '{}', using default.", config.theme_name);
        Theme::default()
    });
    State::new(
        store,
        FormDefaults {
            owner: config.default_owner.clone(),
        },
        theme,
        logs,
    )
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config, options: Options) -> Result<()> {
        let logs = LogBuffer::default();
        CustomLogger::init(logs.clone(), config.log_level_filter())?;

        info!("Starting application...");
        let (tx, rx) = std::sync::mpsc::channel::<WorkerEvent>();
        let (config_save_tx, config_save_rx) = std::sync::mpsc::channel::<()>();

        let mut state = initial_state(&config, logs);
        state.set_worker_sender(tx);
        state.set_config_save_sender(config_save_tx);
        if let Some(path) = options.route.as_deref() {
            state
                .navigate_path(path)
                .map_err(|e| anyhow!("Invalid --route: {}", e))?;
        }

        let mut app = App {
            state: Arc::new(Mutex::new(state)),
            config,
        };
        app.start_worker(rx)?;
        app.start_config_saver(config_save_rx);
        app.start_ui().await?;

        {
            let state = app.state.lock().await;
            app.config.theme_name = state.get_theme().name.clone();
            if let Err(e) = app.config.save() {
                error!("Failed to save config on exit: {}", e);
            }
        }

        info!("Exiting application...");
        Ok(())
    }

    /// Start a thread to handle config save requests.
    ///
    fn start_config_saver(&self, receiver: ConfigSaveReceiver) {
        let state = Arc::clone(&self.state);
        let mut config = self.config.clone();
        std::thread::spawn(move || {
            while receiver.recv().is_ok() {
                let theme_name = state.blocking_lock().get_theme().name.clone();
                config.theme_name = theme_name;
                if let Err(e) = config.save() {
                    error!("Failed to save config: {}", e);
                }
            }
        });
    }

    /// Start a separate thread for simulated background actions.
    ///
    fn start_worker(&self, receiver: WorkerEventReceiver) -> Result<()> {
        debug!("Creating new thread for background actions...");
        let cloned_state = Arc::clone(&self.state);
        let delay = self.config.simulated_delay();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        std::thread::spawn(move || {
            runtime.block_on(async {
                let mut worker_event_handler = WorkerEventHandler::new(&cloned_state, delay);
                while let Ok(worker_event) = receiver.recv() {
                    if let Err(e) = worker_event_handler.handle(worker_event).await {
                        error!("Failed to handle worker event: {}", e);
                    }
                }
            })
        });
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let terminal_event_handler = TerminalEventHandler::new();
        let result = loop {
            let mut state = self.state.lock().await;
            if let Ok(size) = terminal.size() {
                state.set_terminal_size(size);
            }
            if let Err(e) = terminal.draw(|frame| crate::ui::render(frame, &mut state)) {
                break Err(e.into());
            }
            match terminal_event_handler.handle_next(&mut state) {
                Ok(true) => (),
                Ok(false) => {
                    debug!("Received application exit request.");
                    break Ok(());
                }
                Err(e) => break Err(e),
            }
        };

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::Collection;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path, seed: bool) -> Config {
        let mut config = Config::new();
        config.data_dir = dir.to_path_buf();
        config.seed_demo_data = seed;
        config
    }

    #[test]
    fn initial_state_seeds_demo_data() {
        let dir = tempdir().unwrap();
        let state = initial_state(&config(dir.path(), true), LogBuffer::default());
        assert!(!state.store().contacts.is_empty());
        assert!(state.store().is_mirrored(Collection::Emails));
        assert!(!state.store().is_mirrored(Collection::Contacts));
    }

    #[test]
    fn initial_state_without_demo_is_empty() {
        let dir = tempdir().unwrap();
        let state = initial_state(&config(dir.path(), false), LogBuffer::default());
        assert!(state.store().contacts.is_empty());
        assert!(state.store().emails.is_empty());
    }

    #[test]
    fn mirrored_emails_reload_from_data_dir() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), true);
        let removed = {
            let mut state = initial_state(&config, LogBuffer::default());
            let id = state.store().emails.items()[0].id.clone();
            state
                .store_mut()
                .remove_many(Collection::Emails, &[id.clone()]);
            id
        };
        let state = initial_state(&config, LogBuffer::default());
        assert!(state.store().emails.get(&removed).is_none());
        assert!(dir.path().join("emails.json").exists());
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path(), false);
        config.theme_name = "neon".to_string();
        let state = initial_state(&config, LogBuffer::default());
        assert_eq!(state.get_theme(), &Theme::default());
    }
}
