#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    NewPost,
    Post(String),
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}
