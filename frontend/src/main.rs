mod api;
mod components;
mod config;
mod upload;

use std::rc::Rc;

use api::HttpClassifier;
use components::handlers;
use components::results::render_results;
use components::upload_section::{render_upload_section, DropTarget};
use components::utils::debounce;
use config::AppConfig;
use shared::ResultView;
use upload::BrowserFile;
use web_sys::DragEvent;
use yew::prelude::*;

pub enum Msg {
    // Input events
    HandleDrop(DragEvent),
    FilesSelected(Vec<BrowserFile>),
    OpenFilePicker,

    // UI states
    SetDragging(bool),
    Uploading(bool),
    ShowResult(ResultView),
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: AppConfig,
}

// Owns the drop target, the hidden picker and the result area for the
// lifetime of the page.
pub struct App {
    classifier: Rc<HttpClassifier>,
    file_input: NodeRef,
    // Built once so a re-render mid-upload cannot drop a pending click.
    open_picker: Callback<MouseEvent>,
    drop_target: DropTarget,
    result: ResultView,
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = &ctx.props().config;
        log::info!("Classifying uploads via {}", config.endpoint);

        let link = ctx.link().clone();

        Self {
            classifier: Rc::new(HttpClassifier::new(config.endpoint.clone())),
            file_input: NodeRef::default(),
            open_picker: debounce(300, move || link.send_message(Msg::OpenFilePicker)),
            drop_target: DropTarget::default(),
            result: ResultView::Empty,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::FilesSelected(files) => handlers::handle_files_selected(self, ctx, files),
            Msg::OpenFilePicker => handlers::open_file_picker(self),

            Msg::SetDragging(is_dragging) => self.drop_target.set_dragging(is_dragging),
            Msg::Uploading(uploading) => self.drop_target.set_uploading(uploading),
            Msg::ShowResult(view) => {
                self.result = view;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                <main class="main-content">
                    { render_upload_section(self, ctx) }
                    { render_results(self) }
                </main>
            </div>
        }
    }
}

fn main() {
    let config = AppConfig::load();
    wasm_logger::init(wasm_logger::Config::new(config.log_level));
    for warning in &config.warnings {
        log::warn!("{}", warning);
    }
    log::info!("App starting...");
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
