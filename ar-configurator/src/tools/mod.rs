//! User-facing interaction tools.
//!
//! ## Modes
//!
//! The `ModeManager` resource keeps exactly one mode active:
//! - `Placement`: touches hit-test tracked surfaces and place, select or
//!   rotate objects.
//! - `Inspection`: touches drive the viewer and the interactable parts of the
//!   inspected model; placement input is dropped.
//!
//! ```text
//! Keyboard / InspectAccessory
//!   └─> ModeSelectionEvent / ModeManager::enter_inspection()
//!       ├─> placement: drive_placement() gates its pointer
//!       └─> viewer: drive_viewer(), handle_interactables()
//!             └─> ShowAccessoryInfo ─> InfoPanelDispatcher ─> PanelContent
//! ```

/// Accessory catalog, display records and the panel UI.
pub mod info_panel;

/// Steering wheel and hotspot parts of the inspected model.
pub mod interactables;

/// Exclusive placement / inspection mode switching.
pub mod mode_manager;

/// Surface hit-testing, validation, anchoring and drag rotation of placed objects.
pub mod placement;

/// Rotate, pan and zoom of a single inspected model.
pub mod viewer;
