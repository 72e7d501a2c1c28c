use std::future::poll_fn;
use std::task::Poll;

use formats::{FlightRouteRecord, GeoFeatureCollection, flight_routes_from_value};
use layers::{
    Category, LayerError, LayerId, LayerRegistry, LayerSpec, MapSurface, OverlayTracker,
    PathEngine, PlaybackId, Route, RouteAnimator,
};
use runtime::{Delivery, Event, EventBus, FeedSubscription};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::action::OperatorAction;
use crate::config::SessionConfig;

pub const ROUTE_FEED: &str = "routes";

#[derive(Debug, Copy, Clone)]
enum FeedSource {
    Stations(Category),
    Routes,
}

/// Controller for one map surface: holds feed data until the surface is
/// ready, routes operator actions to the layer registry and route animator,
/// and tears everything down again.
///
/// Every alert and rejected delivery is also recorded on the event bus
/// (`alert` and `delivery-failure` kinds).
pub struct MapSession {
    config: SessionConfig,
    registry: LayerRegistry,
    animator: RouteAnimator,
    routes: Vec<FlightRouteRecord>,
    held: [Option<GeoFeatureCollection>; 3],
    station_feeds: Vec<(Category, FeedSubscription<Value>)>,
    route_feeds: Vec<FeedSubscription<Value>>,
    tile_layer: Option<LayerId>,
    ready: bool,
    closed: bool,
    bus: EventBus,
}

impl MapSession {
    pub fn new(config: SessionConfig) -> Self {
        let overlays = OverlayTracker::with_radius_m(config.range_ring_m());
        Self {
            registry: LayerRegistry::new(overlays),
            animator: RouteAnimator::new(config.motion.clone()),
            config,
            routes: Vec::new(),
            held: Default::default(),
            station_feeds: Vec::new(),
            route_feeds: Vec::new(),
            tile_layer: None,
            ready: false,
            closed: false,
            bus: EventBus::new(),
        }
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Takes every recorded event, leaving the bus empty.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    pub fn routes(&self) -> &[FlightRouteRecord] {
        &self.routes
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Latest collection received for `category` before the surface was ready.
    pub fn held(&self, category: Category) -> Option<&GeoFeatureCollection> {
        self.held[category.index()].as_ref()
    }

    pub fn subscribe_stations(&mut self, category: Category, feed: FeedSubscription<Value>) {
        debug!(%category, feed = feed.name(), "station feed subscribed");
        self.station_feeds.push((category, feed));
    }

    pub fn subscribe_routes(&mut self, feed: FeedSubscription<Value>) {
        debug!(feed = feed.name(), "route feed subscribed");
        self.route_feeds.push(feed);
    }

    /// Adds the base tiles, sets the initial view, attaches the marker
    /// sublayer and loads whatever was held. Only the first call does anything.
    pub fn on_surface_ready(&mut self, surface: &mut dyn MapSurface) -> bool {
        if self.ready || self.closed {
            debug!("surface ready ignored");
            return false;
        }
        self.ready = true;

        let tiles = surface.add_layer(&LayerSpec::Tiles(self.config.tiles.clone()));
        self.tile_layer = Some(tiles);
        surface.set_view(self.config.initial_center, self.config.initial_zoom);
        self.registry.attach(surface);

        for category in Category::ALL {
            if let Some(collection) = self.held[category.index()].take() {
                if let Err(e) = self.registry.load(category, &collection) {
                    self.delivery_failed(&e);
                }
            }
        }
        info!(
            center = %self.config.initial_center.key(),
            zoom = self.config.initial_zoom,
            "map surface ready"
        );
        true
    }

    /// Accepts one station delivery. Before the surface is ready the
    /// collection is held (replacing any earlier one); afterwards it is loaded
    /// straight into the registry. A rejected delivery leaves previous data in
    /// place.
    pub fn deliver_stations(
        &mut self,
        category: Category,
        delivery: Delivery<Value>,
    ) -> Result<usize, LayerError> {
        if self.closed {
            debug!(%category, "delivery after teardown dropped");
            return Ok(0);
        }
        let failure = |reason: String| LayerError::SubscriptionDeliveryFailure {
            feed: category.slug().to_string(),
            reason,
        };
        let collection = match delivery {
            Delivery::Payload(value) => GeoFeatureCollection::from_geojson_value(&value)
                .map_err(|e| failure(e.to_string()))?,
            Delivery::Invalid(reason) => return Err(failure(reason)),
        };
        self.bus.emit(
            "delivery",
            format!("{category}: {} features", collection.len()),
        );

        if self.ready {
            self.registry.load(category, &collection)
        } else {
            let n = collection.len();
            debug!(%category, features = n, "held until the surface is ready");
            self.held[category.index()] = Some(collection);
            Ok(n)
        }
    }

    /// Replaces the known flight routes.
    pub fn deliver_routes(&mut self, delivery: Delivery<Value>) -> Result<usize, LayerError> {
        if self.closed {
            debug!("route delivery after teardown dropped");
            return Ok(0);
        }
        let failure = |reason: String| LayerError::SubscriptionDeliveryFailure {
            feed: ROUTE_FEED.to_string(),
            reason,
        };
        let routes = match delivery {
            Delivery::Payload(value) => {
                flight_routes_from_value(value).map_err(|e| failure(e.to_string()))?
            }
            Delivery::Invalid(reason) => return Err(failure(reason)),
        };
        self.bus
            .emit("delivery", format!("{ROUTE_FEED}: {} routes", routes.len()));
        info!(routes = routes.len(), "flight routes updated");
        self.routes = routes;
        Ok(self.routes.len())
    }

    /// Handles everything already queued on the subscribed feeds without
    /// waiting. Returns the number of deliveries handled.
    pub fn pump(&mut self) -> usize {
        let mut queued = Vec::new();
        for (category, feed) in &mut self.station_feeds {
            while let Some(delivery) = feed.try_next() {
                queued.push((FeedSource::Stations(*category), delivery));
            }
        }
        for feed in &mut self.route_feeds {
            while let Some(delivery) = feed.try_next() {
                queued.push((FeedSource::Routes, delivery));
            }
        }

        let handled = queued.len();
        for (source, delivery) in queued {
            self.dispatch(source, delivery);
        }
        handled
    }

    /// Handles deliveries from all feeds as they arrive until every feed is
    /// finished. A feed that stays open never holds back the others.
    pub async fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Some((source, delivery)) = self.next_delivery().await {
            handled += 1;
            self.dispatch(source, delivery);
        }
        handled
    }

    /// Next delivery from whichever feed has one ready; `None` once all are
    /// finished.
    async fn next_delivery(&mut self) -> Option<(FeedSource, Delivery<Value>)> {
        let stations = &mut self.station_feeds;
        let routes = &mut self.route_feeds;
        poll_fn(|cx| {
            let mut open = false;
            for (category, feed) in stations.iter_mut() {
                match feed.poll_next(cx) {
                    Poll::Ready(Some(d)) => {
                        return Poll::Ready(Some((FeedSource::Stations(*category), d)));
                    }
                    Poll::Ready(None) => {}
                    Poll::Pending => open = true,
                }
            }
            for feed in routes.iter_mut() {
                match feed.poll_next(cx) {
                    Poll::Ready(Some(d)) => return Poll::Ready(Some((FeedSource::Routes, d))),
                    Poll::Ready(None) => {}
                    Poll::Pending => open = true,
                }
            }
            if open { Poll::Pending } else { Poll::Ready(None) }
        })
        .await
    }

    fn dispatch(&mut self, source: FeedSource, delivery: Delivery<Value>) {
        let result = match source {
            FeedSource::Stations(category) => self.deliver_stations(category, delivery),
            FeedSource::Routes => self.deliver_routes(delivery),
        };
        if let Err(e) = result {
            self.delivery_failed(&e);
        }
    }

    /// Runs one operator action. Failures are returned and recorded as alerts;
    /// redundant toggles are not failures.
    pub fn handle(
        &mut self,
        action: OperatorAction,
        surface: &mut dyn MapSurface,
        engine: &mut dyn PathEngine,
    ) -> Result<(), LayerError> {
        debug!(%action, "operator action");
        let result = match action {
            OperatorAction::Show(category) => {
                self.registry.show(category, surface);
                Ok(())
            }
            OperatorAction::Hide(category) => {
                self.registry.hide(category, surface);
                Ok(())
            }
            OperatorAction::DrawCircles(category) => {
                self.registry.draw_circles(category, surface).map(|_| ())
            }
            OperatorAction::PlayRoute(index) => self.play_route(index, engine).map(|_| ()),
        };
        if let Err(e) = &result {
            warn!(%action, "{e}");
            self.bus.emit("alert", e.to_string());
        }
        result
    }

    /// Plays the full waypoint list of route `index`.
    pub fn play_route(
        &self,
        index: usize,
        engine: &mut dyn PathEngine,
    ) -> Result<PlaybackId, LayerError> {
        let record = self.routes.get(index).ok_or(LayerError::RouteNotFound {
            index,
            available: self.routes.len(),
        })?;
        let route = Route::from_record(record)?;
        self.animator.play(&route, engine)
    }

    /// Cancels every subscription and removes everything this session put on
    /// the surface. Playbacks already started run to completion. Idempotent.
    pub fn teardown(&mut self, surface: &mut dyn MapSurface) {
        for (_, feed) in &mut self.station_feeds {
            feed.unsubscribe();
        }
        for feed in &mut self.route_feeds {
            feed.unsubscribe();
        }
        self.registry.detach(surface);
        for category in Category::ALL {
            self.registry.unload(category, surface);
        }
        if let Some(tiles) = self.tile_layer.take() {
            surface.remove_layer(tiles);
        }
        self.held = Default::default();
        self.routes.clear();

        if !self.closed {
            info!("map session torn down");
        }
        self.closed = true;
    }

    fn delivery_failed(&mut self, e: &LayerError) {
        warn!("{e}");
        self.bus.emit("delivery-failure", e.to_string());
    }
}
