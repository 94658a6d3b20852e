mod interaction;
mod render;
mod view;
