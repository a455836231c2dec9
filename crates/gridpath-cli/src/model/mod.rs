pub use self::navigator_model::NavigatorModel;

mod navigator_model;
