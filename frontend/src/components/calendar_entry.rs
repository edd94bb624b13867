use gloo_console::{error, info};
use itinerary_lib::{
    calendar::{CalendarRow, Control},
    position::haversine_distance,
    timestamp::{format_input, parse_input},
    DestinationId, Field, FieldUpdate, Flag, Itinerary, ItineraryError, ItineraryEvent, TravelMode,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::{config::ENTRY_CLASS, notice::show_notice, util::format_distance};

#[derive(PartialEq, Properties, Clone)]
pub struct EntryProps {
    pub itinerary: Itinerary,
    pub row: CalendarRow,
}

fn flag_control(flag: Flag) -> Control {
    match flag {
        Flag::Baggage => Control::Baggage,
        Flag::Carseat => Control::Carseat,
        Flag::Professional => Control::Professional,
        Flag::Passengers => Control::Passengers,
    }
}

fn flag_class(flag: Flag) -> &'static str {
    match flag {
        Flag::Baggage => "baggage",
        Flag::Carseat => "carseat",
        Flag::Professional => "professional",
        Flag::Passengers => "passengers",
    }
}

fn flag_label(flag: Flag) -> &'static str {
    match flag {
        Flag::Baggage => "Baggage",
        Flag::Carseat => "Car seat",
        Flag::Professional => "Professional driver",
        Flag::Passengers => "Passengers",
    }
}

fn input_value(event: &Event) -> String {
    event.target_unchecked_into::<HtmlInputElement>().value()
}

/// Callback writing a single field of the row's record.
fn field_callback<E: 'static>(
    itinerary: &Itinerary,
    id: DestinationId,
    to_update: impl Fn(E) -> FieldUpdate + 'static,
) -> Callback<E> {
    let itinerary = itinerary.clone();
    Callback::from(move |event: E| {
        if let Err(err) = itinerary.update(id, to_update(event)) {
            error!(format!("Failed to update stop {}: {}", id.0, err));
        }
    })
}

#[function_component]
pub fn CalendarEntry(props: &EntryProps) -> Html {
    let trigger = use_force_update();
    let itinerary = &props.itinerary;
    let row = props.row;
    let id = row.id;

    {
        let itinerary = itinerary.clone();
        use_effect_with(id, move |id| {
            let id = *id;
            // Own record, plus moves of the neighbour for the leg distance
            let subscription = itinerary.subscribe(move |event| match event {
                ItineraryEvent::Changed { id: changed, .. } if *changed == id => trigger.force_update(),
                ItineraryEvent::Changed { field: Field::Position, .. } => trigger.force_update(),
                _ => {}
            });
            move || drop(subscription)
        });
    }

    let Some(destination) = itinerary.get(id) else {
        return html! {};
    };

    let leg_distance = row.index.checked_sub(1).and_then(|previous| {
        itinerary
            .borrow()
            .get(previous)
            .map(|p| haversine_distance(&p.position(), &destination.position()))
    });

    let on_mode = field_callback(itinerary, id, |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        FieldUpdate::Mode(TravelMode::from_key(&select.value()))
    });
    let on_title = field_callback(itinerary, id, |e: Event| FieldUpdate::Title(input_value(&e)));
    let on_depart = field_callback(itinerary, id, |e: Event| FieldUpdate::Depart(parse_input(&input_value(&e))));
    let on_mouse_enter = field_callback(itinerary, id, |_: MouseEvent| FieldUpdate::Active(true));
    let on_mouse_leave = field_callback(itinerary, id, |_: MouseEvent| FieldUpdate::Active(false));

    let on_arrive = {
        let itinerary = itinerary.clone();
        Callback::from(move |e: Event| {
            if let Err(err) = itinerary.edit_arrival(id, parse_input(&input_value(&e))) {
                error!(format!("Failed to update stop {}: {}", id.0, err));
            }
        })
    };

    let on_delete = {
        let itinerary = itinerary.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(err) = itinerary.remove(id) {
                error!(format!("Failed to delete stop {}: {}", id.0, err));
            }
        })
    };

    let on_insert = {
        let itinerary = itinerary.clone();
        Callback::from(move |_: MouseEvent| {
            let inserted = itinerary
                .index_of(id)
                .ok_or(ItineraryError::UnknownDestination(id))
                .and_then(|index| itinerary.insert_after(index));
            match inserted {
                Ok(new_id) => info!(format!("Inserted stop {} after {}", new_id.0, id.0)),
                Err(err @ ItineraryError::InsertAfterLast) => show_notice(&err.to_string()),
                Err(err) => error!(format!("Failed to insert after stop {}: {}", id.0, err)),
            }
        })
    };

    let flags = Flag::ALL.into_iter().map(|flag| {
        let on_change = field_callback(itinerary, id, move |e: Event| {
            FieldUpdate::Flag(flag, e.target_unchecked_into::<HtmlInputElement>().checked())
        });
        html! {
            <label class="flag">
                <input
                    type="checkbox"
                    class={flag_class(flag)}
                    checked={destination.flag(flag)}
                    disabled={row.is_disabled(flag_control(flag))}
                    onchange={on_change}
                />
                {flag_label(flag)}
            </label>
        }
    });

    html! {
        <div class={ENTRY_CLASS}>
            <div class="entry-header">
                <input
                    type="text"
                    class="title"
                    value={destination.title().to_owned()}
                    disabled={row.is_disabled(Control::Title)}
                    onchange={on_title}
                    onmouseenter={on_mouse_enter}
                    onmouseleave={on_mouse_leave}
                />
                if row.is_home() {
                    <span class="home-label">{"Home"}</span>
                }
                <button class="insertEvent" onclick={on_insert}>{"+"}</button>
                <button class="deleteEvent" onclick={on_delete}>{"✕"}</button>
            </div>
            if row.mode_visible() {
                <div class="modeBox">
                    <select class="modeSelect" disabled={row.is_disabled(Control::Mode)} onchange={on_mode}>
                        <option value={TravelMode::UNSET_KEY} selected={destination.mode().is_none()}>
                            {"Travel mode..."}
                        </option>
                        { for TravelMode::ALL.into_iter().map(|mode| html! {
                            <option value={mode.key()} selected={destination.mode() == Some(mode)}>
                                {mode.label()}
                            </option>
                        }) }
                    </select>
                    if let Some(distance) = leg_distance {
                        <label class="leg-distance">{format!("{} from previous stop", format_distance(distance))}</label>
                    }
                </div>
            }
            <div class="times">
                <label>
                    {"Arrive"}
                    <input
                        type="datetime-local"
                        class="arrive"
                        value={format_input(destination.arrive())}
                        disabled={row.is_disabled(Control::Arrival)}
                        onchange={on_arrive}
                    />
                </label>
                <label>
                    {"Depart"}
                    <input
                        type="datetime-local"
                        class="depart"
                        value={format_input(destination.depart())}
                        disabled={row.is_disabled(Control::Departure)}
                        onchange={on_depart}
                    />
                </label>
            </div>
            <div class="flags">
                { for flags }
            </div>
        </div>
    }
}
