pub mod post_create;
mod post_detail;
mod post_list;
mod top_bar;
