use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

// Only the last click within `delay_ms` fires; earlier pending ones are cancelled.
pub fn debounce<F>(delay_ms: u32, action: F) -> Callback<MouseEvent>
where
    F: Fn() + 'static,
{
    let action = Rc::new(action);
    let pending = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        if let Some(previous) = pending.borrow_mut().take() {
            previous.cancel();
        }

        let action = Rc::clone(&action);
        *pending.borrow_mut() = Some(Timeout::new(delay_ms, move || action()));
    })
}
