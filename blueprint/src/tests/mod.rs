mod builder;
mod framework;
mod padding;
