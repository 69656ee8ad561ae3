mod fat_tree;
mod ident;
mod session;
mod shape_spec;
