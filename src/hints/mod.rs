pub mod bunsetsu;
pub mod composer;
pub mod romanize;

pub use bunsetsu::{
    BunsetsuGroup,
    StyleClass,
};
pub use composer::{
    HintComposer,
    HintView,
};
pub use romanize::romanize;
