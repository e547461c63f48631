use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

use crate::upload::browser_files;
use crate::{App, Msg};

/// Visual marks on the drop target. Each upload sets and clears `uploading`
/// on its own; overlapping uploads are not reconciled.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DropTarget {
    pub is_dragging: bool,
    pub uploading: bool,
}

impl DropTarget {
    pub fn set_dragging(&mut self, is_dragging: bool) -> bool {
        let changed = self.is_dragging != is_dragging;
        self.is_dragging = is_dragging;
        changed
    }

    pub fn set_uploading(&mut self, uploading: bool) -> bool {
        let changed = self.uploading != uploading;
        self.uploading = uploading;
        changed
    }

    pub fn classes(&self) -> Classes {
        classes!(
            "upload-area",
            self.is_dragging.then_some("dragover"),
            self.uploading.then_some("uploading")
        )
    }
}

pub fn render_upload_section(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files: Vec<_> = input
            .files()
            .map(|file_list| browser_files(&file_list).collect())
            .unwrap_or_default();

        // Lets the same file be picked twice in a row.
        input.set_value("");

        Msg::FilesSelected(files)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);

    html! {
        <div class="upload-section">
            <input
                type="file"
                id="fileInput"
                ref={app.file_input.clone()}
                accept="image/png,image/jpeg"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="dropbox"
                class={app.drop_target.classes()}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={app.open_picker.clone()}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop an image here, or click to browse"}</p>
                    <p class="file-types">{"Supported formats: PNG, JPG, JPEG (max 5MB)"}</p>
                </div>
            </div>
        </div>
    }
}
