//! 桌面外壳（Tauri）
//!
//! 把核心状态机接到真实窗口上：
//! - `PopupWindow` 作为托管状态放在 `Mutex` 中，只在主线程修改；
//! - 历史队列的变更事件由泵线程接收，再经 `run_on_main_thread` 转交主线程处理；
//! - 停靠动画与自动隐藏由异步运行时上的约 60Hz 定时器驱动，同样转交主线程；
//! - 前端通过命令上报指针 / 悬停 / 双击 / 开关事件，通过 `popup://view` 事件接收界面数据。

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use dpi::{PhysicalPosition, PhysicalSize};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, State, WebviewWindow};

use crate::clipboard::{HistoryFeed, SystemClipboard};
use crate::dock::{DockDirection, MonitorArea};
use crate::error::AppError;
use crate::history::RowId;
use crate::popup::{PopupView, PopupWindow};
use crate::settings::{AppSettings, SETTINGS_FILE_NAME};

/// 弹窗窗口标签（见 `tauri.conf.json`）
pub const POPUP_WINDOW_LABEL: &str = "popup";
/// 推送界面数据的事件名
pub const POPUP_VIEW_EVENT: &str = "popup://view";
/// 动画帧间隔
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// 托管状态
pub struct DesktopState {
    popup: Mutex<PopupWindow>,
    settings: Mutex<AppSettings>,
    settings_path: PathBuf,
}

fn lock_recover<'a, T>(mutex: &'a Mutex<T>, name: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("{}锁中毒，继续使用恢复数据", name);
            poisoned.into_inner()
        }
    }
}

impl DesktopState {
    pub fn popup(&self) -> MutexGuard<'_, PopupWindow> {
        lock_recover(&self.popup, "弹窗状态")
    }

    pub fn settings(&self) -> MutexGuard<'_, AppSettings> {
        lock_recover(&self.settings, "设置")
    }

    /// 把当前弹窗状态写入设置并落盘
    pub fn persist(&self) -> Result<(), AppError> {
        let encoded = self.popup().state().encode();
        let mut settings = self.settings();
        settings.popup_window_state = encoded;
        settings.save(&self.settings_path)
    }
}

pub fn settings_file_path(app: &AppHandle) -> Result<PathBuf, AppError> {
    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Storage(format!("获取应用数据目录失败: {}", e)))?;
    Ok(app_data_dir.join(SETTINGS_FILE_NAME))
}

pub fn popup_window(app: &AppHandle) -> Result<WebviewWindow, AppError> {
    app.get_webview_window(POPUP_WINDOW_LABEL)
        .ok_or_else(|| AppError::Window("弹窗窗口不存在".to_string()))
}

pub fn read_monitors(window: &WebviewWindow) -> Result<Vec<MonitorArea>, AppError> {
    let monitors = window
        .available_monitors()
        .map_err(|e| AppError::Window(format!("Failed to get available monitors: {}", e)))?;
    Ok(monitors
        .iter()
        .map(|monitor| MonitorArea {
            position: *monitor.position(),
            size: *monitor.size(),
        })
        .collect())
}

/// 读取窗口与显示器信息，创建弹窗状态并恢复上次保存的设置
pub fn init_state(app: &AppHandle) -> Result<DesktopState, AppError> {
    let settings_path = settings_file_path(app)?;
    let settings = match AppSettings::load(&settings_path) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("读取设置失败，使用默认设置: {}", err);
            AppSettings::default()
        }
    };

    let capacity = HistoryFeed::global().set_capacity(settings.history_capacity);
    log::info!("📋 历史容量: {}", capacity);

    let window = popup_window(app)?;
    let position = window
        .outer_position()
        .map_err(|e| AppError::Window(format!("Failed to get window position: {}", e)))?;
    let size = window
        .outer_size()
        .map_err(|e| AppError::Window(format!("Failed to get window size: {}", e)))?;

    let mut popup = PopupWindow::new(position, size, read_monitors(&window)?);
    popup.load_state(&settings.popup_window_state);
    apply_position(&window, popup.dock().position())?;

    Ok(DesktopState {
        popup: Mutex::new(popup),
        settings: Mutex::new(settings),
        settings_path,
    })
}

fn apply_position(window: &WebviewWindow, position: PhysicalPosition<i32>) -> Result<(), AppError> {
    window
        .set_position(position)
        .map_err(|e| AppError::Window(format!("Failed to set window position: {}", e)))
}

fn apply_visibility(window: &WebviewWindow, visible: bool) -> Result<(), AppError> {
    let on_screen = window
        .is_visible()
        .map_err(|e| AppError::Window(format!("Failed to query visibility: {}", e)))?;
    match (visible, on_screen) {
        (true, false) => window
            .show()
            .map_err(|e| AppError::Window(format!("Failed to show window: {}", e))),
        (false, true) => window
            .hide()
            .map_err(|e| AppError::Window(format!("Failed to hide window: {}", e))),
        _ => Ok(()),
    }
}

/// `popup://view` 事件负载；`refit` 要求前端重新测量内容并上报尺寸
#[derive(Clone, Serialize)]
struct ViewEvent<'a> {
    #[serde(flatten)]
    view: &'a PopupView,
    refit: bool,
}

/// 把弹窗状态应用到真实窗口，并推送界面数据
fn render(app: &AppHandle, popup: &mut PopupWindow) -> Result<(), AppError> {
    let window = popup_window(app)?;
    apply_position(&window, popup.dock().position())?;
    apply_visibility(&window, popup.is_visible())?;

    let view = popup.view();
    let payload = ViewEvent {
        view: &view,
        refit: popup.take_refit_request(),
    };
    app.emit(POPUP_VIEW_EVENT, &payload)
        .map_err(|e| AppError::Window(format!("Failed to emit view: {}", e)))
}

fn render_or_log(app: &AppHandle, popup: &mut PopupWindow) {
    if let Err(err) = render(app, popup) {
        log::warn!("刷新弹窗失败: {}", err);
    }
}

fn on_feed_changed(app: &AppHandle) {
    let state = app.state::<DesktopState>();
    let mut popup = state.popup();
    let snapshots = HistoryFeed::global().data_list();
    popup.on_feed_changed(&snapshots, Instant::now());
    render_or_log(app, &mut popup);
}

fn on_frame(app: &AppHandle) {
    let state = app.state::<DesktopState>();
    let mut popup = state.popup();
    let outcome = popup.tick(Instant::now());
    if outcome.hidden {
        render_or_log(app, &mut popup);
    } else if outcome.moved {
        if let Ok(window) = popup_window(app) {
            if let Err(err) = apply_position(&window, popup.dock().position()) {
                log::warn!("停靠动画移动窗口失败: {}", err);
            }
        }
    }
}

/// 订阅历史队列，在泵线程接收事件并转交主线程
pub fn start_feed_pump(app: AppHandle) {
    let rx = HistoryFeed::global().subscribe();
    thread::spawn(move || {
        for event in rx {
            log::debug!("历史队列事件: {:?}", event);
            let handle = app.clone();
            if let Err(err) = app.run_on_main_thread(move || on_feed_changed(&handle)) {
                log::error!("历史事件转交主线程失败，停止泵线程: {}", err);
                break;
            }
        }
    });
}

/// 动画帧定时器
pub fn start_frame_ticker(app: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let mut interval = tokio::time::interval(FRAME_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let handle = app.clone();
            if app.run_on_main_thread(move || on_frame(&handle)).is_err() {
                break;
            }
        }
    });
}

/// 托盘调用：强制显示 / 隐藏
pub fn set_popup_visible(app: &AppHandle, visible: bool) {
    let state = app.state::<DesktopState>();
    let mut popup = state.popup();
    if visible {
        popup.show();
    } else {
        popup.hide();
    }
    render_or_log(app, &mut popup);
}

/// 托盘调用：直接停靠到指定边
pub fn dock_popup(app: &AppHandle, direction: DockDirection) {
    let state = app.state::<DesktopState>();
    let mut popup = state.popup();
    popup.dock_mut().set_dock(direction);
    popup.show();
    log::info!("📌 托盘设置停靠方向: {}", direction);
    render_or_log(app, &mut popup);
}

#[tauri::command]
pub fn get_popup_view(state: State<'_, DesktopState>) -> PopupView {
    state.popup().view()
}

#[tauri::command]
pub fn popup_pointer_press(
    app: AppHandle,
    state: State<'_, DesktopState>,
    x: i32,
    y: i32,
    drag: bool,
) -> Result<(), AppError> {
    let mut popup = state.popup();
    if !drag {
        popup.on_pointer_press(PhysicalPosition::new(x, y), false, Instant::now());
        return Ok(());
    }
    let window = popup_window(&app)?;
    popup.set_monitors(read_monitors(&window)?);
    popup.on_pointer_press(PhysicalPosition::new(x, y), true, Instant::now());
    apply_position(&window, popup.dock().position())
}

#[tauri::command]
pub fn popup_pointer_move(
    app: AppHandle,
    state: State<'_, DesktopState>,
    x: i32,
    y: i32,
) -> Result<DockDirection, AppError> {
    let mut popup = state.popup();
    if let Some(position) = popup.on_pointer_move(PhysicalPosition::new(x, y)) {
        apply_position(&popup_window(&app)?, position)?;
    }
    Ok(popup.dock().pending_dock())
}

#[tauri::command]
pub fn popup_pointer_release(
    app: AppHandle,
    state: State<'_, DesktopState>,
) -> Result<DockDirection, AppError> {
    let mut popup = state.popup();
    let direction = popup.on_pointer_release(Instant::now());
    render(&app, &mut popup)?;
    Ok(direction)
}

#[tauri::command]
pub fn popup_pointer_enter(state: State<'_, DesktopState>) {
    state.popup().on_enter(Instant::now());
}

#[tauri::command]
pub fn popup_pointer_leave(state: State<'_, DesktopState>) {
    state.popup().on_leave(Instant::now());
}

/// 双击行写回剪贴板；写入在阻塞线程中重试，不占用弹窗锁
#[tauri::command]
pub async fn popup_activate_row(
    state: State<'_, DesktopState>,
    id: RowId,
) -> Result<bool, AppError> {
    let snapshot = state.popup().row_snapshot(id);
    let Some(snapshot) = snapshot else {
        return Ok(false);
    };
    if !snapshot.is_valid() {
        return Ok(false);
    }

    tokio::task::spawn_blocking(move || {
        snapshot.copy_to_clipboard(&mut SystemClipboard::new())
    })
    .await
    .map_err(|e| AppError::Clipboard(format!("线程执行失败：{}", e)))??;
    Ok(true)
}

#[tauri::command]
pub fn popup_set_expanded(
    app: AppHandle,
    state: State<'_, DesktopState>,
    expanded: bool,
) -> Result<(), AppError> {
    let mut popup = state.popup();
    popup.set_expanded(expanded);
    render(&app, &mut popup)
}

#[tauri::command]
pub fn popup_set_auto_show(
    app: AppHandle,
    state: State<'_, DesktopState>,
    auto_show: bool,
) -> Result<(), AppError> {
    let mut popup = state.popup();
    popup.set_auto_show(auto_show, Instant::now());
    render(&app, &mut popup)
}

/// 前端完成布局后上报内容尺寸（物理像素）
#[tauri::command]
pub fn popup_fit_content(
    app: AppHandle,
    state: State<'_, DesktopState>,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let window = popup_window(&app)?;
    let size = PhysicalSize::new(width.max(1), height.max(1));
    window
        .set_size(size)
        .map_err(|e| AppError::Window(format!("Failed to set window size: {}", e)))?;
    let mut popup = state.popup();
    popup.set_window_size(size);
    apply_position(&window, popup.dock().position())
}

#[tauri::command]
pub fn get_app_settings(state: State<'_, DesktopState>) -> AppSettings {
    state.settings().clone()
}

#[tauri::command]
pub fn set_history_capacity(
    state: State<'_, DesktopState>,
    capacity: usize,
) -> Result<usize, AppError> {
    let applied = HistoryFeed::global().set_capacity(capacity);
    state.settings().history_capacity = applied;
    state.persist()?;
    Ok(applied)
}
