pub mod card;
pub mod judge;
pub mod session;


pub use card::{
    Card,
    CardState,
    CardView,
};
pub use judge::{
    judge,
    CharSpan,
    Judgement,
};
pub use session::{
    InputOutcome,
    PracticeSession,
};
