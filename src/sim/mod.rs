//! Sign-in battle simulation
//!
//! All gameplay logic lives here. No DOM access: layout comes in through
//! `platform::LayoutProbe`, time comes in as a frame timestamp, and the only
//! randomness is the session's seeded RNG.

pub mod collision;
pub mod input;
pub mod phase;
pub mod state;
pub mod tick;
pub mod transform;

pub use collision::{Axis, RectContact, ball_rect_contact};
pub use input::{Direction, nudge_paddle_x, pointer_paddle_x};
pub use phase::{Epoch, Session, Snapshot};
pub use state::{Arena, BallState, BattleState, EnemyState, PaddleState, Phase};
pub use tick::{TickOutcome, tick};
pub use transform::{TransformAnimator, TransformFrame, TransformMeta};
