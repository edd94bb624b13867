use crate::components::{itinerary_panel::ItineraryPanel, map_component::MapComponent};
use gloo_console::{error, info};
use itinerary_lib::Itinerary;
use notice::show_notice;
use yew::prelude::*;

mod components;
mod config;
mod notice;
mod util;

enum MainMsg {
    Proceed,
}

struct Model {
    // Shared by the map and the panel, which never talk to each other directly
    itinerary: Itinerary,
}

impl Model {
    fn proceed(&self) {
        if let Err(err) = self.itinerary.validate() {
            show_notice(&err.to_string());
            return;
        }

        match serde_json::to_string(&self.itinerary.snapshot()) {
            Ok(json) => info!(format!("Itinerary complete: {}", json)),
            Err(err) => error!(format!("Failed to serialize itinerary: {}", err)),
        }
    }
}

impl Component for Model {
    type Message = MainMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            itinerary: Itinerary::new(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MainMsg::Proceed => {
                info!("Proceed");
                self.proceed();
            }
        }
        false
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let on_next = ctx.link().callback(|_: MouseEvent| MainMsg::Proceed);

        html! { <>
            <div class="side">
                <ItineraryPanel itinerary={self.itinerary.clone()} />
                <button id="next" class="next-btn" onclick={on_next}>{"Next"}</button>
            </div>
            <MapComponent itinerary={self.itinerary.clone()} />
        </> }
    }
}

fn main() {
    yew::Renderer::<Model>::new().render();
}
