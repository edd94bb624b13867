use chrono::Local;
use gloo_console::{error, info};
use itinerary_lib::{calendar::CalendarRow, Itinerary, ItineraryEvent, Subscription};
use yew::prelude::*;

use crate::{components::calendar_entry::CalendarEntry, config::CALENDAR_CLASS};

pub enum PanelMsg {
    Itinerary(ItineraryEvent),
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub itinerary: Itinerary,
}

/// One editable row per stop. Any add or remove redraws every row.
pub struct ItineraryPanel {
    rows: Vec<CalendarRow>,
    generation: u64,
    _subscription: Subscription,
}

impl ItineraryPanel {
    fn rebuild(&mut self, itinerary: &Itinerary) {
        self.rows = prepare_rows(itinerary);
        self.generation += 1;
        info!(format!("Calendar rebuilt with {} rows", self.rows.len()));
    }
}

impl Component for ItineraryPanel {
    type Message = PanelMsg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let rows = prepare_rows(&ctx.props().itinerary);

        Self {
            rows,
            generation: 0,
            _subscription: subscribe(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            PanelMsg::Itinerary(event) if event.is_membership() => {
                self.rebuild(&ctx.props().itinerary);
                true
            }
            // Rows follow their own record
            PanelMsg::Itinerary(_) => false,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().itinerary != old_props.itinerary {
            self._subscription = subscribe(ctx);
            self.rebuild(&ctx.props().itinerary);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let itinerary = &ctx.props().itinerary;

        html! {
            <div class={CALENDAR_CLASS}>
                <h1>{"Itinerary"}</h1>
                if self.rows.is_empty() {
                    <label>{"Double click on the map to add your home location"}</label>
                }
                { for self.rows.iter().map(|row| html! {
                    <CalendarEntry
                        key={format!("{}-{}", self.generation, row.id.0)}
                        itinerary={itinerary.clone()}
                        row={*row}
                    />
                }) }
            </div>
        }
    }
}

fn subscribe(ctx: &Context<ItineraryPanel>) -> Subscription {
    let link = ctx.link().clone();
    ctx.props()
        .itinerary
        .subscribe(move |event| link.send_message(PanelMsg::Itinerary(*event)))
}

/// Render pass over the itinerary, this writes the filled in times back.
fn prepare_rows(itinerary: &Itinerary) -> Vec<CalendarRow> {
    let today = Local::now().date_naive();
    match itinerary.prepare_calendar(today) {
        Ok(rows) => rows,
        Err(err) => {
            error!(format!("Failed to prepare calendar: {}", err));
            Vec::new()
        }
    }
}
