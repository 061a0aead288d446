//! Drives a viewer against its collaborators.
//!
//! The overlay core only queues effects. A [`Session`] owns the viewer together
//! with an annotation client and an image source, runs every queued effect and
//! feeds the results back until the viewer has nothing left to ask for.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use web_time::Instant;

use roimark_overlay::{Direction, Effect, KeyEvent, PointerEvent, ShortcutAction, Viewer};

use crate::client::AnnotationClient;
use crate::imaging::ImageSource;
use crate::keybindings::KeyBindings;
use crate::listeners::{KeyboardHub, Subscription};

/// A viewer wired to a remote store and an image source.
pub struct Session<C, S> {
    viewer: Viewer,
    client: C,
    images: S,
}

impl<C: AnnotationClient, S: ImageSource> Session<C, S> {
    pub fn new(viewer: Viewer, client: C, images: S) -> Self {
        Self {
            viewer,
            client,
            images,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn images(&self) -> &S {
        &self.images
    }

    /// Execute queued effects, including those their completions queue, until
    /// none are left. Returns how many were executed.
    pub fn run_until_idle(&mut self) -> usize {
        let start = Instant::now();
        let mut executed = 0;
        loop {
            let effects = self.viewer.drain_effects();
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                self.execute(effect);
                executed += 1;
            }
        }
        if executed > 0 {
            log::debug!(
                "Session: ran {} effects in {:.2}ms",
                executed,
                start.elapsed().as_secs_f64() * 1000.0
            );
        }
        executed
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::ResolveImage { request, path } => {
                let result = self.images.resolve_for_viewer(&path);
                self.viewer.complete_image(request, result);
            }
            Effect::Sync { request, call } => {
                let result = self.client.execute(&call);
                if let Err(e) = &result {
                    log::debug!("Session: {} {} failed: {}", request, call.name(), e);
                }
                self.viewer.complete_sync(request, result);
            }
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.viewer.handle_pointer(event);
        self.run_until_idle();
    }

    /// Run the shortcut bound to a key, if any. Returns true if it changed anything.
    pub fn dispatch_key(&mut self, event: &KeyEvent, bindings: &KeyBindings) -> bool {
        let Some(action) = bindings.action_for_key(event.key) else {
            log::trace!("Session: '{}' is not bound", event.key.name());
            return false;
        };
        let changed = self.viewer.handle_shortcut(action, event.focus);
        self.run_until_idle();
        changed
    }

    pub fn open(&mut self, path: impl Into<String>) {
        self.viewer.open(path);
        self.run_until_idle();
    }

    pub fn step(&mut self, direction: Direction) -> bool {
        let changed = self.viewer.step(direction);
        self.run_until_idle();
        changed
    }
}

/// Keyboard registrations of a mounted viewer.
///
/// The listeners are released when this is dropped or [`MountedView::unmount`]ed.
pub struct MountedView {
    subscriptions: Vec<Subscription>,
}

impl MountedView {
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn unmount(self) {
        log::debug!(
            "MountedView: releasing {} keyboard listeners",
            self.subscriptions.len()
        );
    }
}

/// Register the viewer's shortcut listeners with the hub.
///
/// Deletion and navigation get separate listeners, like separate window
/// handlers. The listeners hold the session weakly so a dropped session
/// simply stops reacting.
pub fn mount<C, S>(
    session: &Rc<RefCell<Session<C, S>>>,
    hub: &KeyboardHub,
    bindings: &KeyBindings,
) -> MountedView
where
    C: AnnotationClient + 'static,
    S: ImageSource + 'static,
{
    let delete = hub.subscribe(shortcut_listener(
        Rc::downgrade(session),
        bindings.clone(),
        |action| action == ShortcutAction::DeleteSelected,
    ));
    let navigate = hub.subscribe(shortcut_listener(
        Rc::downgrade(session),
        bindings.clone(),
        |action| matches!(action, ShortcutAction::Step(_)),
    ));
    log::debug!("Viewer mounted with keyboard listeners");

    MountedView {
        subscriptions: vec![delete, navigate],
    }
}

fn shortcut_listener<C, S>(
    session: Weak<RefCell<Session<C, S>>>,
    bindings: KeyBindings,
    accepts: fn(ShortcutAction) -> bool,
) -> impl FnMut(&KeyEvent) -> bool + 'static
where
    C: AnnotationClient + 'static,
    S: ImageSource + 'static,
{
    move |event| {
        let Some(action) = bindings.action_for_key(event.key).filter(|a| accepts(*a)) else {
            return false;
        };
        let Some(session) = session.upgrade() else {
            return false;
        };
        let Ok(mut session) = session.try_borrow_mut() else {
            log::warn!("Shortcut '{}' ignored: session is busy", action.name());
            return false;
        };
        let changed = session.viewer.handle_shortcut(action, event.focus);
        session.run_until_idle();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryStore;
    use crate::imaging::StaticImageSource;
    use roimark_overlay::{
        FocusTarget, ImageSlice, Key, Navigator, OverlayBounds, PointerEventKind, Rect,
        ScreenPoint, ViewerSettings,
    };

    const PATHS: [&str; 3] = ["study/IM0001.dcm", "study/IM0002.dcm", "study/IM0003.dcm"];

    fn slice(path: &str, n: usize) -> ImageSlice {
        ImageSlice::new(path, 256, 256, format!("1.2.840.{}", n))
    }

    fn session() -> Session<MemoryStore, StaticImageSource> {
        let mut images = StaticImageSource::new();
        let mut store = MemoryStore::new();
        for (n, path) in PATHS.iter().enumerate() {
            let slice = slice(path, n + 1);
            store.register_image(slice.key());
            images.insert(slice);
        }
        let navigator = Navigator::new(PATHS.iter().map(|p| p.to_string()).collect());
        let viewer = Viewer::new(ViewerSettings::default(), navigator);
        let mut session = Session::new(viewer, store, images);
        session.open(PATHS[0]);
        session
    }

    fn pointer(kind: PointerEventKind, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(
            kind,
            ScreenPoint::new(x, y),
            OverlayBounds::new(0.0, 0.0, 256.0, 256.0),
        )
    }

    fn draw(session: &mut Session<MemoryStore, StaticImageSource>) {
        session.handle_pointer(pointer(PointerEventKind::Down, 10.0, 10.0));
        session.handle_pointer(pointer(PointerEventKind::Move, 60.0, 40.0));
        session.handle_pointer(pointer(PointerEventKind::Up, 60.0, 40.0));
    }

    #[test]
    fn test_open_resolves_and_lists() {
        let session = session();
        let viewer = session.viewer();
        assert_eq!(viewer.slice().unwrap().instance_uid, "1.2.840.1");
        assert_eq!(viewer.pending_requests(), 0);
        assert_eq!(session.client().calls(), 1);
    }

    #[test]
    fn test_drawn_rectangle_is_persisted() {
        let mut session = session();
        draw(&mut session);

        assert_eq!(session.viewer().annotations().len(), 1);
        let stored = &session.client().labels()[0];
        assert_eq!((stored.x, stored.y, stored.width, stored.height), (10, 10, 50, 30));
        assert_eq!(stored.label, "nodule");
        assert_eq!(session.viewer().annotations()[0].id, stored.id);
    }

    #[test]
    fn test_dispatch_key_deletes_selection() {
        let mut session = session();
        draw(&mut session);
        session.handle_pointer(pointer(PointerEventKind::Down, 30.0, 20.0));
        session.handle_pointer(pointer(PointerEventKind::Up, 30.0, 20.0));
        assert!(session.viewer().selected().is_some());

        let bindings = KeyBindings::default();
        let typing = KeyEvent::new(Key::Delete, FocusTarget::TextEditor);
        assert!(!session.dispatch_key(&typing, &bindings));
        assert_eq!(session.client().labels().len(), 1);

        assert!(session.dispatch_key(&KeyEvent::overlay(Key::Delete), &bindings));
        assert!(session.viewer().annotations().is_empty());
        assert!(session.client().labels().is_empty());
    }

    #[test]
    fn test_mounted_listeners_drive_the_viewer() {
        let session = Rc::new(RefCell::new(session()));
        let hub = KeyboardHub::new();
        let view = mount(&session, &hub, &KeyBindings::default());
        assert_eq!(view.subscription_count(), 2);
        assert_eq!(hub.listener_count(), 2);

        assert!(hub.dispatch(&KeyEvent::overlay(Key::ArrowRight)));
        assert_eq!(session.borrow().viewer().navigator().progress(), "2/3");
        assert_eq!(
            session.borrow().viewer().slice().unwrap().path,
            "study/IM0002.dcm"
        );

        view.unmount();
        assert_eq!(hub.listener_count(), 0);
        assert!(!hub.dispatch(&KeyEvent::overlay(Key::ArrowRight)));
        assert_eq!(session.borrow().viewer().navigator().progress(), "2/3");
    }

    #[test]
    fn test_remount_fires_once() {
        let session = Rc::new(RefCell::new(session()));
        let hub = KeyboardHub::new();
        let bindings = KeyBindings::default();

        drop(mount(&session, &hub, &bindings));
        let _view = mount(&session, &hub, &bindings);

        hub.dispatch(&KeyEvent::overlay(Key::ArrowRight));
        assert_eq!(session.borrow().viewer().navigator().progress(), "2/3");
    }

    #[test]
    fn test_listener_ignores_dropped_session() {
        let session = Rc::new(RefCell::new(session()));
        let hub = KeyboardHub::new();
        let _view = mount(&session, &hub, &KeyBindings::default());
        drop(session);
        assert!(!hub.dispatch(&KeyEvent::overlay(Key::ArrowRight)));
    }

    #[test]
    fn test_annotations_reload_after_navigation() {
        let mut session = session();
        draw(&mut session);
        assert!(session.step(Direction::Next));
        assert!(session.viewer().annotations().is_empty());
        assert!(session.step(Direction::Previous));
        assert_eq!(
            session.viewer().annotations()[0].rect,
            Rect::new(10, 10, 50, 30)
        );
    }
}
