use std::rc::Rc;

use shared::workflow::{accept_input, ResultSurface};
use shared::ResultView;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlInputElement};
use yew::html::Scope;
use yew::prelude::*;

use crate::upload::{browser_files, BrowserFile};
use crate::{App, Msg};

/// Feeds workflow updates back into the component as messages.
pub struct LinkSurface {
    link: Scope<App>,
}

impl ResultSurface for LinkSurface {
    fn set_uploading(&self, uploading: bool) {
        self.link.send_message(Msg::Uploading(uploading));
    }

    fn show(&self, view: ResultView) {
        self.link.send_message(Msg::ShowResult(view));
    }
}

pub fn handle_drop(app: &mut App, ctx: &Context<App>, event: DragEvent) -> bool {
    event.prevent_default();
    app.drop_target.set_dragging(false);

    // The data transfer is only readable while the event is being dispatched.
    let files: Vec<BrowserFile> = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .map(|file_list| browser_files(&file_list).collect())
        .unwrap_or_default();

    start_upload(app, ctx, files);
    true
}

pub fn handle_files_selected(app: &mut App, ctx: &Context<App>, files: Vec<BrowserFile>) -> bool {
    start_upload(app, ctx, files);
    false
}

pub fn open_file_picker(app: &mut App) -> bool {
    if let Some(input) = app.file_input.cast::<HtmlInputElement>() {
        input.click();
    }
    false
}

fn start_upload(app: &App, ctx: &Context<App>, files: Vec<BrowserFile>) {
    if files.is_empty() {
        return;
    }
    if files.len() > 1 {
        log::debug!("Ignoring {} extra file(s), only the first is classified", files.len() - 1);
    }

    let classifier = Rc::clone(&app.classifier);
    let surface = LinkSurface { link: ctx.link().clone() };

    spawn_local(async move {
        accept_input(files, &*classifier, &surface).await;
    });
}
