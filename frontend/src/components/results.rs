use shared::render::LOADING_MESSAGE;
use shared::{PredictionView, ResultView};
use yew::prelude::*;

use crate::App;

pub fn render_results(app: &App) -> Html {
    html! {
        <div id="resultContent" class="result-content">
            { render_view(&app.result) }
        </div>
    }
}

fn render_view(view: &ResultView) -> Html {
    match view {
        ResultView::Empty => html! {},
        ResultView::Loading => html! {
            <div class="loading">
                <i class="fa-solid fa-spinner fa-spin"></i>
                { format!(" {}", LOADING_MESSAGE) }
            </div>
        },
        ResultView::Failure(message) => html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ message }</p>
            </div>
        },
        ResultView::Prediction(prediction) => render_prediction(prediction),
    }
}

fn render_prediction(prediction: &PredictionView) -> Html {
    html! {
        <>
            <div class="result-class">{ &prediction.class_name }</div>
            <div class="result-probability">{ &prediction.confidence }</div>
            {
                if let Some(probabilities) = &prediction.probabilities {
                    html! {
                        <div class="result-details">
                            { for probabilities.iter().map(|line| html! {
                                <div class="probability-item">
                                    <div class="probability-name">{ &line.name }</div>
                                    <div class="probability-value">{ &line.value }</div>
                                </div>
                            })}
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            {
                match &prediction.input_type {
                    Some(input_type) => html! {
                        <div class="result-input-type">{ input_type }</div>
                    },
                    None => html! {},
                }
            }
        </>
    }
}
