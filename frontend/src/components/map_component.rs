use geo_types::Point;
use gloo_console::{error, info};
use gloo_utils::document;
use itinerary_lib::{
    destination::MarkerStyle, Destination, DestinationId, Field, FieldUpdate, Itinerary, ItineraryEvent, Subscription,
};
use leaflet::{
    LatLng, Map, MapOptions, Marker, MarkerOptions, MouseEvent as MapMouseEvent, Polyline, PolylineOptions, TileLayer,
    TileLayerOptions, Tooltip, TooltipOptions,
};
use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::{Element, HtmlElement, Node, js_sys::Array};
use yew::prelude::*;

use crate::{
    config::{MAP_CENTER, MAP_CLASS, MAP_MAX_ZOOM, MAP_ZOOM, PATH_COLOR, TILE_URL},
    util::{escape_html, to_lat_lng, to_point},
};

pub enum MapMsg {
    DoubleClick(Point),
    Itinerary(ItineraryEvent),
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub itinerary: Itinerary,
}

struct MarkerHandle {
    id: DestinationId,
    marker: Marker,
    tooltip: Tooltip,
    _on_drag_end: Closure<dyn Fn(JsValue)>,
    _on_click: Closure<dyn Fn(JsValue)>,
}

/// Markers and the connecting path for every stop, rebuilt from scratch on change.
pub struct MapComponent {
    map: Map,
    container: HtmlElement,
    markers: Vec<MarkerHandle>,
    // Handlers of the previous generation may still be on the stack when a rebuild runs
    retired: Vec<MarkerHandle>,
    path: Option<Polyline>,
    _on_dbl_click: Closure<dyn Fn(MapMouseEvent)>,
    _subscription: Subscription,
}

impl MapComponent {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }

    fn rebuild(&mut self, itinerary: &Itinerary) {
        self.retired.clear();
        for handle in self.markers.drain(..) {
            handle.marker.remove();
            self.retired.push(handle);
        }
        if let Some(path) = self.path.take() {
            path.remove();
        }

        let destinations = itinerary.snapshot();
        for destination in &destinations {
            let handle = make_marker(destination, itinerary);
            handle.marker.add_to(&self.map);
            self.markers.push(handle);
        }

        let path = make_path(&destinations);
        path.add_to(&self.map);
        self.path = Some(path);

        info!(format!("Map rebuilt with {} stops", destinations.len()));
    }

    fn restyle(&self, itinerary: &Itinerary, id: DestinationId) {
        let Some(handle) = self.markers.iter().find(|h| h.id == id) else {
            return;
        };
        if let Some(destination) = itinerary.get(id) {
            handle.tooltip.set_content(&label_html(&destination).into());
        }
    }
}

impl Component for MapComponent {
    type Message = MapMsg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let container: Element = document().create_element("div").expect("div is a valid tag");
        let container: HtmlElement = container.dyn_into().expect("div is an HtmlElement");
        container.set_class_name(MAP_CLASS);

        let leaflet_map = Map::new_with_element(&container, &MapOptions::default());
        leaflet_map.double_click_zoom().disable();

        let link = ctx.link().clone();
        let on_dbl_click = Closure::<dyn Fn(MapMouseEvent)>::new(move |event: MapMouseEvent| {
            link.send_message(MapMsg::DoubleClick(to_point(&event.lat_lng())));
        });
        leaflet_map.on("dblclick", on_dbl_click.as_ref());

        Self {
            map: leaflet_map,
            container,
            markers: Vec::new(),
            retired: Vec::new(),
            path: None,
            _on_dbl_click: on_dbl_click,
            _subscription: subscribe(ctx),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.map.set_max_zoom(MAP_MAX_ZOOM);
            self.map.set_view(&LatLng::new(MAP_CENTER.0, MAP_CENTER.1), MAP_ZOOM);
            add_tile_layer(&self.map);
            self.rebuild(&ctx.props().itinerary);
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let itinerary = &ctx.props().itinerary;
        match msg {
            MapMsg::DoubleClick(position) => {
                let id = itinerary.append(position);
                info!(format!("Added stop {} at {}, {}", id.0, position.y(), position.x()));
            }
            MapMsg::Itinerary(event) => match event {
                ItineraryEvent::Added { .. }
                | ItineraryEvent::Removed { .. }
                | ItineraryEvent::Changed { field: Field::Position, .. } => self.rebuild(itinerary),
                ItineraryEvent::Changed { id, field: Field::Active | Field::Title } => self.restyle(itinerary, id),
                ItineraryEvent::Changed { .. } => {}
            },
        }
        // Leaflet owns the markers, nothing to diff
        false
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        self.map.invalidate_size(false);
        if ctx.props().itinerary != old_props.itinerary {
            self._subscription = subscribe(ctx);
            self.rebuild(&ctx.props().itinerary);
        }
        false
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class={MAP_CLASS}>
                {self.render_map()}
            </div>
        }
    }
}

fn subscribe(ctx: &Context<MapComponent>) -> Subscription {
    let link = ctx.link().clone();
    ctx.props()
        .itinerary
        .subscribe(move |event| link.send_message(MapMsg::Itinerary(*event)))
}

fn label_html(destination: &Destination) -> String {
    format!(
        "<span class='{}'>{}</span>",
        MarkerStyle::of(destination).class_name(),
        escape_html(destination.title())
    )
}

fn make_marker(destination: &Destination, itinerary: &Itinerary) -> MarkerHandle {
    let id = destination.id();

    let options = MarkerOptions::new();
    options.set_draggable(true);
    options.set_rise_on_hover(true);
    let marker = Marker::new_with_options(&to_lat_lng(&destination.position()), &options);

    let tooltip_opts = TooltipOptions::default();
    tooltip_opts.set_permanent(true);
    tooltip_opts.set_direction("right".into());
    let tooltip = Tooltip::new(&tooltip_opts, None);
    tooltip.set_content(&label_html(destination).into());
    marker.bind_tooltip(&tooltip);

    let on_drag_end = {
        let itinerary = itinerary.clone();
        let marker = marker.clone();
        Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| {
            let position = to_point(&marker.get_lat_lng());
            if let Err(err) = itinerary.update(id, FieldUpdate::Position(position)) {
                error!(format!("Failed to move stop {}: {}", id.0, err));
            }
        })
    };
    marker.on("dragend", on_drag_end.as_ref());

    let on_click = {
        let marker = marker.clone();
        Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| {
            let lat_lng = marker.get_lat_lng();
            info!(format!("Marker {} at {}, {}", id.0, lat_lng.lat(), lat_lng.lng()));
        })
    };
    marker.on("click", on_click.as_ref());

    MarkerHandle {
        id,
        marker,
        tooltip,
        _on_drag_end: on_drag_end,
        _on_click: on_click,
    }
}

fn make_path(destinations: &[Destination]) -> Polyline {
    let opts = PolylineOptions::new();
    opts.set_color(PATH_COLOR.into());
    opts.set_smooth_factor(1.5);

    let points = destinations.iter().map(|d| to_lat_lng(&d.position()));

    Polyline::new_with_options(&Array::from_iter(points), &opts)
}

fn add_tile_layer(map: &Map) {
    let opts = TileLayerOptions::new();
    opts.set_update_when_idle(true);
    TileLayer::new_options(TILE_URL, &opts).add_to(map);
}
