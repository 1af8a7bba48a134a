// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # 剪贴板提醒弹窗：应用入口
//!
//! 本文件仅负责应用初始化、托盘与命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use clipboard_reminder::clipboard::{self, HistoryFeed};
use clipboard_reminder::desktop::{self, DesktopState};
use clipboard_reminder::dock::DockDirection;
use tauri::Manager;
use tauri::image::Image;
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};

fn save_before_exit(app: &tauri::AppHandle) {
    if let Some(state) = app.try_state::<DesktopState>() {
        match state.persist() {
            Ok(()) => log::info!("💾 退出前已保存弹窗状态"),
            Err(err) => log::error!("退出前保存设置失败: {err}"),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .setup(|app| {
            log::info!("setup: begin");
            let app_icon = Image::from_bytes(include_bytes!("../icons/icon.png"))?;

            let handle = app.handle().clone();
            let state = desktop::init_state(&handle)?;
            app.manage(state);
            log::info!("setup: popup state managed");

            if let Ok(window) = desktop::popup_window(&handle) {
                let _ = window.set_icon(app_icon.clone());
            }

            // 泵线程须在监听启动前完成订阅
            desktop::start_feed_pump(handle.clone());
            clipboard::start_monitoring(HistoryFeed::global());
            desktop::start_frame_ticker(handle);
            log::info!("setup: clipboard monitor stage done");

            let show_i = MenuItem::with_id(app, "show", "显示", true, None::<&str>)?;
            let hide_i = MenuItem::with_id(app, "hide", "隐藏", true, None::<&str>)?;
            let dock_top_i = MenuItem::with_id(app, "dock_top", "停靠到顶部", true, None::<&str>)?;
            let dock_left_i =
                MenuItem::with_id(app, "dock_left", "停靠到左侧", true, None::<&str>)?;
            let dock_right_i =
                MenuItem::with_id(app, "dock_right", "停靠到右侧", true, None::<&str>)?;
            let undock_i = MenuItem::with_id(app, "undock", "取消停靠", true, None::<&str>)?;
            let quit_i = MenuItem::with_id(app, "quit", "退出", true, None::<&str>)?;
            let separator_a = PredefinedMenuItem::separator(app)?;
            let separator_b = PredefinedMenuItem::separator(app)?;
            let menu = Menu::with_items(
                app,
                &[
                    &show_i,
                    &hide_i,
                    &separator_a,
                    &dock_top_i,
                    &dock_left_i,
                    &dock_right_i,
                    &undock_i,
                    &separator_b,
                    &quit_i,
                ],
            )?;

            let tray_result = TrayIconBuilder::new()
                .icon(app_icon)
                .menu(&menu)
                .on_menu_event(|app, event| match event.id.as_ref() {
                    "show" => desktop::set_popup_visible(app, true),
                    "hide" => desktop::set_popup_visible(app, false),
                    "dock_top" => desktop::dock_popup(app, DockDirection::Top),
                    "dock_left" => desktop::dock_popup(app, DockDirection::Left),
                    "dock_right" => desktop::dock_popup(app, DockDirection::Right),
                    "undock" => desktop::dock_popup(app, DockDirection::None),
                    "quit" => {
                        save_before_exit(app);
                        app.exit(0);
                    }
                    _ => {}
                })
                .on_tray_icon_event(|tray, event| {
                    if let TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        desktop::set_popup_visible(tray.app_handle(), true);
                    }
                })
                .build(app);

            if let Err(err) = tray_result {
                log::warn!("托盘图标创建失败，回退为显示弹窗: {err}");
                desktop::set_popup_visible(app.handle(), true);
            }

            log::info!("setup: complete");
            Ok(())
        })
        // 窗口关闭时隐藏而非退出
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::CloseRequested { api, .. } = event {
                desktop::set_popup_visible(window.app_handle(), false);
                api.prevent_close();
            }
        })
        .invoke_handler(tauri::generate_handler![
            // 界面数据
            desktop::get_popup_view,
            // 指针与悬停
            desktop::popup_pointer_press,
            desktop::popup_pointer_move,
            desktop::popup_pointer_release,
            desktop::popup_pointer_enter,
            desktop::popup_pointer_leave,
            // 行与开关
            desktop::popup_activate_row,
            desktop::popup_set_expanded,
            desktop::popup_set_auto_show,
            desktop::popup_fit_content,
            // 应用设置
            desktop::get_app_settings,
            desktop::set_history_capacity,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
