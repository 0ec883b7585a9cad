//! State update logic (Elm Architecture)

use std::time::Instant;

use futures::executor::block_on;
use tracing::warn;

use crate::action::ActionRequest;
use crate::controller::ThreadStatus;
use crate::db::CommentPayload;
use crate::message::Message;
use crate::model::{Focus, Model};
use crate::{config, theme};

pub fn update(model: &mut Model, msg: Message) {
    if !matches!(
        msg,
        Message::Tick | Message::Resize { .. } | Message::Noop | Message::Quit
    ) {
        model.flash_message = None;
        model.quit_armed = false;
    }

    match msg {
        // === Thread Navigation ===
        Message::SelectNext => {
            let count = model.thread().items().len();
            if model.selected + 1 < count {
                model.selected += 1;
            }
        }
        Message::SelectPrev => {
            model.selected = model.selected.saturating_sub(1);
        }
        Message::SelectFirst => {
            model.selected = 0;
        }
        Message::SelectLast => {
            model.selected = model.thread().items().len().saturating_sub(1);
        }

        // === Composer ===
        Message::FocusComposer => {
            model.thread_mut().expand_composer();
            model.focus = Focus::Composer;
        }
        Message::ComposerEdit(edit) => {
            model.thread_mut().edit_composer(edit);
        }
        Message::SubmitComposer => {
            let Some(request) = model.thread_mut().submit_composer() else {
                return;
            };
            let reset = model.thread().options().reset_on_save;
            if run_request(model, request) {
                if reset {
                    if let Err(err) = model.reload_thread() {
                        warn!("reload after save failed: {err:#}");
                        model.flash_message = Some(format!("Saved, but reload failed: {err}"));
                    }
                }
                model.selected = model.thread().items().len().saturating_sub(1);
                model.focus = Focus::Thread;
            }
        }
        Message::CancelComposer => {
            if model.thread_mut().cancel_composer() {
                if model.composer_dismissed.take() {
                    model.flash_message = Some("Nothing to reply to yet".to_string());
                }
                model.focus = Focus::Thread;
            }
        }

        // === Comment Actions ===
        Message::StartEdit => {
            if let Some(id) = model.selected_id() {
                if model.thread().is_editing(id) || model.thread_mut().start_edit(id) {
                    model.focus = Focus::ItemEditor(id);
                } else {
                    model.flash_message = Some("This comment can't be edited".to_string());
                }
            }
        }
        Message::ItemEdit(edit) => {
            if let Focus::ItemEditor(id) = model.focus {
                model.thread_mut().edit_item(id, edit);
            }
        }
        Message::SubmitEdit => {
            if let Focus::ItemEditor(id) = model.focus {
                if let Some(request) = model.thread_mut().submit_edit(id) {
                    if run_request(model, request) {
                        model.focus = Focus::Thread;
                    }
                } else if model.thread().editor(id).is_some_and(|e| e.draft().is_blank()) {
                    model.flash_message =
                        Some("Comment is empty. Delete it with d instead.".to_string());
                }
            }
        }
        Message::CancelEdit => {
            if let Focus::ItemEditor(id) = model.focus {
                model.thread_mut().cancel_edit(id);
                model.focus = Focus::Thread;
            }
        }
        Message::LeaveEditor => {
            if matches!(model.focus, Focus::Composer | Focus::ItemEditor(_)) {
                model.focus = Focus::Thread;
            }
        }
        Message::Quote => {
            if let Some(id) = model.selected_id() {
                if model.thread_mut().quote(id) {
                    model.focus = Focus::Composer;
                } else {
                    model.flash_message = Some("This comment can't be quoted".to_string());
                }
            }
        }
        Message::RequestDelete => {
            let deletable = model
                .selected_id()
                .filter(|id| model.thread().item(*id).is_some_and(|item| !item.is_deleted()));
            if let Some(id) = deletable {
                model.focus = Focus::ConfirmDelete(id);
            }
        }
        Message::ConfirmDelete => {
            if let Focus::ConfirmDelete(id) = model.focus {
                model.focus = Focus::Thread;
                if let Some(request) = model.thread_mut().submit_delete(id) {
                    run_request(model, request);
                }
            }
        }
        Message::CancelDelete => {
            if matches!(model.focus, Focus::ConfirmDelete(_)) {
                model.focus = Focus::Thread;
            }
        }

        // === Thread Actions ===
        Message::ToggleResolved => {
            let resolve = model.thread().status() == ThreadStatus::Open;
            if let Some(request) = model.thread_mut().submit_resolution(resolve) {
                run_request(model, request);
            }
        }

        // === Theme Selection ===
        Message::CycleTheme => {
            let names = theme::built_in_theme_names();
            let current = names.iter().position(|name| *name == model.theme.name);
            let next = current.map_or(0, |index| (index + 1) % names.len());
            if let Some(name) = names.get(next) {
                update(model, Message::ApplyTheme((*name).to_string()));
            }
        }
        Message::ApplyTheme(theme_name) => {
            if let Some(loaded) = theme::load_built_in_theme(&theme_name) {
                model.theme = loaded;
                model.config.theme = Some(theme_name);
                if let Err(err) = config::save_ui_config(&model.config) {
                    warn!("failed to save config: {err:#}");
                }
            }
        }

        // === System ===
        Message::Resize { width, height } => {
            model.resize(width, height);
        }

        Message::Tick => {
            model.height_monitor.poll(Instant::now());
        }

        Message::Noop => {}

        Message::Quit => {
            if model.unsaved.get() && !model.quit_armed {
                model.quit_armed = true;
                model.flash_message =
                    Some("Unsaved changes. Press q again to quit.".to_string());
            } else {
                model.should_quit = true;
            }
        }
    }

    model.needs_redraw = true;
}

/// Send `request` through the session and surface failures in the flash
/// line. Returns whether the gateway reported success.
fn run_request(model: &mut Model, request: ActionRequest<CommentPayload>) -> bool {
    let action = request.action;
    match block_on(model.session.dispatch(request)) {
        Ok(true) => true,
        Ok(false) => {
            model.flash_message = Some(format!("The {action} did not go through"));
            false
        }
        Err(err) => {
            model.flash_message = Some(format!("Cannot {action}: {err}"));
            false
        }
    }
}
