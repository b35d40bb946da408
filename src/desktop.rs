// src/desktop.rs
//
// Tauri shell: managed state, commands invoked by the webview, and the events
// pushed back to it. Handlers only forward to `Terminal` and `PanelTween`.

use std::sync::Mutex;
use std::time::Instant;

use tauri::{AppHandle, Emitter, Manager, State, WindowEvent};
use tauri_plugin_dialog::DialogExt;

use crate::history::HistoryLine;
use crate::panel::{PanelAnimation, PanelTween};
use crate::port::{self, InboundHandler, NativeDriver, PortEvent, SerialPortInfo};
use crate::settings::{default_log_dir, DisplayConfig, SerialConfig};
use crate::terminal::{Terminal, TerminalSnapshot};

/// Event carrying one received `HistoryLine`.
pub const RECEIVED_EVENT: &str = "serial-received";
/// Event carrying a full `TerminalSnapshot` after an out-of-band change.
pub const STATUS_EVENT: &str = "terminal-status";

pub struct TerminalState(pub Mutex<Terminal<NativeDriver>>);
pub struct PanelState(pub Mutex<PanelTween>);

fn lock_terminal<'a>(
    state: &'a State<'_, TerminalState>,
) -> Result<std::sync::MutexGuard<'a, Terminal<NativeDriver>>, String> {
    state.0.lock().map_err(|e| format!("Terminal state poisoned: {}", e))
}

// ============================================================================
// Port commands
// ============================================================================

#[tauri::command(rename_all = "snake_case")]
fn list_ports(state: State<'_, TerminalState>) -> Result<Vec<SerialPortInfo>, String> {
    let ports = port::list_serial_ports().map_err(|e| e.to_string())?;
    lock_terminal(&state)?.set_status(format!("Found {} serial port(s)", ports.len()));
    Ok(ports)
}

/// Inbound events run on the reader thread; they lock the terminal through
/// the app handle and forward whatever changed to the webview.
fn inbound_handler(app: AppHandle) -> InboundHandler {
    std::sync::Arc::new(move |event: PortEvent| {
        let state = app.state::<TerminalState>();
        let Ok(mut terminal) = state.0.lock() else {
            return;
        };
        let lost = matches!(event, PortEvent::Lost(_));
        let line: Option<HistoryLine> = terminal.on_port_event(event);
        let snapshot = lost.then(|| terminal.snapshot());
        drop(terminal);

        if let Some(line) = line {
            let _ = app.emit(RECEIVED_EVENT, line);
        }
        if let Some(snapshot) = snapshot {
            let _ = app.emit(STATUS_EVENT, snapshot);
        }
    })
}

#[tauri::command(rename_all = "snake_case")]
fn open_port(
    app: AppHandle,
    state: State<'_, TerminalState>,
    port: String,
) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal
        .open(&port, inbound_handler(app))
        .map_err(|e| e.to_string())?;
    Ok(terminal.snapshot())
}

#[tauri::command(rename_all = "snake_case")]
fn close_port(state: State<'_, TerminalState>) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal.close();
    Ok(terminal.snapshot())
}

/// On failure the "Not sent" line is already in the history; the webview
/// refreshes with `get_snapshot`.
#[tauri::command(rename_all = "snake_case")]
fn send_text(
    state: State<'_, TerminalState>,
    text: String,
) -> Result<Option<HistoryLine>, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal.send(&text).map_err(|e| e.to_string())
}

#[tauri::command(rename_all = "snake_case")]
fn clear_received(state: State<'_, TerminalState>) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal.clear_received();
    Ok(terminal.snapshot())
}

#[tauri::command(rename_all = "snake_case")]
fn get_snapshot(state: State<'_, TerminalState>) -> Result<TerminalSnapshot, String> {
    Ok(lock_terminal(&state)?.snapshot())
}

// ============================================================================
// Settings commands
// ============================================================================

#[tauri::command(rename_all = "snake_case")]
fn update_serial_config(
    state: State<'_, TerminalState>,
    config: SerialConfig,
) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal
        .update_serial_config(config)
        .map_err(|e| e.to_string())?;
    Ok(terminal.snapshot())
}

#[tauri::command(rename_all = "snake_case")]
fn update_display_config(
    state: State<'_, TerminalState>,
    config: DisplayConfig,
) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal.set_display_config(config);
    Ok(terminal.snapshot())
}

#[tauri::command(rename_all = "snake_case")]
fn set_log_enabled(
    state: State<'_, TerminalState>,
    enabled: bool,
) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal.set_log_enabled(enabled);
    Ok(terminal.snapshot())
}

#[tauri::command(rename_all = "snake_case")]
fn set_log_append(
    state: State<'_, TerminalState>,
    append: bool,
) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal.set_log_append(append).map_err(|e| e.to_string())?;
    Ok(terminal.snapshot())
}

#[tauri::command(rename_all = "snake_case")]
fn set_log_surface_errors(
    state: State<'_, TerminalState>,
    surface: bool,
) -> Result<TerminalSnapshot, String> {
    let mut terminal = lock_terminal(&state)?;
    terminal.set_log_surface_errors(surface);
    Ok(terminal.snapshot())
}

/// Ask for a log file and point the session log at it.
///
/// Async so the blocking dialog stays off the main thread. Cancelling leaves
/// the current log settings alone.
#[tauri::command(rename_all = "snake_case")]
async fn choose_log_file(
    app: AppHandle,
    state: State<'_, TerminalState>,
) -> Result<TerminalSnapshot, String> {
    let picked = app
        .dialog()
        .file()
        .set_title("Select Log File")
        .set_directory(default_log_dir())
        .add_filter("Text files", &["txt"])
        .add_filter("All files", &["*"])
        .blocking_save_file();

    let mut terminal = lock_terminal(&state)?;
    if let Some(file) = picked {
        let path = file
            .into_path()
            .map_err(|e| format!("Unsupported log file location: {}", e))?;
        terminal
            .set_log_path(Some(path))
            .map_err(|e| e.to_string())?;
    }
    Ok(terminal.snapshot())
}

// ============================================================================
// Settings panel
// ============================================================================

#[tauri::command(rename_all = "snake_case")]
fn toggle_settings_panel(state: State<'_, PanelState>) -> Result<PanelAnimation, String> {
    let mut panel = state
        .0
        .lock()
        .map_err(|e| format!("Panel state poisoned: {}", e))?;
    Ok(panel.toggle(Instant::now()))
}

#[tauri::command(rename_all = "snake_case")]
fn settings_panel_height(state: State<'_, PanelState>) -> Result<f64, String> {
    let panel = state
        .0
        .lock()
        .map_err(|e| format!("Panel state poisoned: {}", e))?;
    Ok(panel.height_at(Instant::now()))
}

// ============================================================================
// Entry point
// ============================================================================

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            match app.path().app_log_dir() {
                Ok(dir) => {
                    if let Err(e) = crate::logging::init_file_logging(&dir) {
                        tlog!("[setup] {}", e);
                    }
                }
                Err(e) => tlog!("[setup] No log directory available: {}", e),
            }
            Ok(())
        })
        .manage(TerminalState(Mutex::new(Terminal::new(NativeDriver::new()))))
        .manage(PanelState(Mutex::new(PanelTween::default())))
        .invoke_handler(tauri::generate_handler![
            list_ports,
            open_port,
            close_port,
            send_text,
            clear_received,
            get_snapshot,
            update_serial_config,
            update_display_config,
            set_log_enabled,
            set_log_append,
            set_log_surface_errors,
            choose_log_file,
            toggle_settings_panel,
            settings_panel_height,
        ])
        .on_window_event(|window, event| {
            // Release the port before the webview goes away so the reader
            // stops emitting into it.
            if let WindowEvent::CloseRequested { .. } = event {
                let state = window.state::<TerminalState>();
                if let Ok(mut terminal) = state.0.lock() {
                    terminal.close();
                }
                crate::logging::stop_file_logging();
            }
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
