mod components;
mod view;

pub use view::{
    BodyView, FieldRow, FormView, FrameView, HeaderView, LoginView, ModalView, PagerView,
    PopupLine, PopupView, RowKind, TableView, draw,
};
