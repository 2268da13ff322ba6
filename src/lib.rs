pub mod inpaint;
pub mod logger;
