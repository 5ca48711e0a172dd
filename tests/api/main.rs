mod helpers;
mod shutdown;
mod ui;
