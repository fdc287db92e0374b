//! Retained-mode 2D scene graph for canvas games and interactive pages.
//!
//! Display objects (bitmaps, frame-animated sprites, text, polygons) live on
//! layers inside a stage. Every property write goes through one path that
//! marks the object dirty; the stage's per-frame [`stage::Stage::tick`]
//! repaints only the layers with dirty objects. Sprites advance their frame
//! cursor on render attempts and report status completion through callbacks.
//! Input is resolved against rotated, anchor-adjusted bounds and returned to
//! the host as [`input::StageEvent`]s.
//!
//! Drawing goes through the [`surface::Surface`] trait. The `web` feature
//! implements it for `CanvasRenderingContext2d` and supplies an
//! `HtmlImageElement` loader; without it, [`surface::DisplayList`] records
//! draw calls for headless use.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`object`] | Display-object base, property write path, shared transform |
//! | [`props`] | Property names, tracked lists, option-value coercion |
//! | [`sprite`] | Frame tables and the sprite animation state machine |
//! | [`bitmap`] | Static images |
//! | [`text`] | Text labels with letter spacing, shadow, and gradient |
//! | [`polygon`] | Filled and stroked polygons |
//! | [`layer`] | One surface plus its ordered objects |
//! | [`stage`] | Layer stack, stage config, and input routing |
//! | [`input`] | Stage events, touch gestures, move throttling |
//! | [`hit`] | Rotated-rectangle containment |
//! | [`geom`] | Points, rectangles, angle helpers |
//! | [`surface`] | Drawing trait and the recording display list |
//! | [`resource`] | Image loading and text measurement collaborators |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric defaults |
//! | `web` | Browser binding (feature `web`) |

pub mod bitmap;
pub mod consts;
pub mod error;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layer;
pub mod object;
pub mod polygon;
pub mod props;
pub mod resource;
pub mod sprite;
pub mod stage;
pub mod surface;
pub mod text;
#[cfg(feature = "web")]
pub mod web;


pub use error::{ResourceError, SceneError};
pub use object::{DisplayObject, ObjectId, ObjectKind};
pub use props::Options;
pub use stage::{Stage, StageConfig};
