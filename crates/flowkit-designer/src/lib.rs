//! # Flowkit Designer
//!
//! Interactive diagram-editing engine: nodes and links on an infinite 2D
//! surface, edited with a pointer, with undo/redo and minimal repaint
//! reporting.
//!
//! ## Core Components
//!
//! - **Diagram**: item storage, link policy, undoable mutators and the
//!   invalidation callback
//! - **Spatial Index**: quadtree turning hit-testing and region queries into
//!   near logarithmic lookups
//! - **Orthogonal Router**: Manhattan link paths that keep clear of both
//!   end nodes
//! - **History**: grouped, bounded undo/redo
//! - **Interaction**: select/move/resize/stretch/relink, rubber band, zoom,
//!   pan and creation tools over a [`Viewport`]
//! - **Renderer**: z-ordered draw calls to a host [`RenderSurface`]
//!
//! ## Architecture
//!
//! ```text
//! pointer events
//!   └── InteractionController ── Viewport, SelectionManager
//!         └── Diagram
//!               ├── DiagramModel (ItemStore + SpatialManager)
//!               ├── TaskManager<DiagramCommand>
//!               └── OrthogonalRouter
//! invalidated region ──> host ──> render_region ──> RenderSurface
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use flowkit_designer::{Diagram, LineStyle};
//!
//! let mut diagram = Diagram::new();
//! let a = diagram.add_node(0.0, 0.0, 100.0, 60.0, "start");
//! let b = diagram.add_node(300.0, 150.0, 100.0, 60.0, "end");
//! diagram.set_default_line_style(LineStyle::Orthogonal);
//! let link = diagram.add_link(a, b, "", None, None).expect("nodes exist");
//!
//! assert!(diagram.link(link).is_some());
//! assert!(diagram.undo());
//! assert!(diagram.link(link).is_none());
//! ```

pub mod commands;
pub mod diagram;
pub mod history;
pub mod interaction;
pub mod item_store;
pub mod model;
pub mod renderer;
pub mod routing;
pub mod selection_manager;
pub mod spatial_index;
pub mod spatial_manager;
pub mod viewport;

pub use commands::DiagramCommand;
pub use diagram::{Diagram, DiagramModel, Invalidation};
pub use history::{ActionCode, Command, Task, TaskManager, TaskState};
pub use interaction::{Handle, InteractionController, Mode, Modifiers, Tool};
pub use item_store::ItemStore;
pub use model::{Item, ItemKind, LineStyle, Link, LinkEnd, Node, NodeShape, Pin};
pub use renderer::{render_all, render_region, PathRole, RenderPath, RenderSurface};
pub use routing::{OrthogonalRouter, RouteEndpoint, Side};
pub use selection_manager::SelectionManager;
pub use spatial_index::{QuadrantId, SpatialIndex, SpatialIndexStats};
pub use spatial_manager::SpatialManager;
pub use viewport::Viewport;

pub use flowkit_core::{DiagramError, ItemId, Point, Rect};
